// src/lib.rs

//! Shared world types for the zone scanner and its tools: column coordinates,
//! the terrain height oracle, heightmaps and emitted zones.

pub mod coords;
pub mod heightmap;
pub mod oracle;
pub mod zone;
pub mod prelude;
