// src/prelude.rs
//! A convenient prelude re-exporting common terrain types.

pub use crate::coords::{BlockPos, ParseCoordsError, XZCoords};
pub use crate::heightmap::{Heightmap, HeightmapGenerator, SEA_LEVEL};
pub use crate::oracle::{TerrainError, TerrainOracle};
pub use crate::zone::Zone;
