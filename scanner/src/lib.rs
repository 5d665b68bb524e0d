// src/lib.rs

//! Incremental flat-zone scanner.
//!
//! Walks a disc of terrain columns one cell at a time, groups equal-height
//! neighbours into components as it goes, and as soon as a component can no
//! longer grow, splits it into rectangles of at least 2x2 and publishes each
//! one as a [`Zone`](terrain::prelude::Zone). A scan can be paused at any cell
//! and resumed later from a checkpoint with identical results.

pub mod checkpoint;
pub mod closer;
pub mod component;
pub mod config;
pub mod control;
pub mod decompose;
pub mod emitter;
pub mod error;
pub mod labeler;
pub mod markers;
pub mod publish;
pub mod scanner;
pub mod session;
pub mod state;
pub mod store;
pub mod union_find;

pub use checkpoint::{CheckpointStatus, ScanCheckpoint, CHECKPOINT_VERSION};
pub use config::{ScanConfig, ScanRegion, StopPolicy, DEFAULT_RADIUS, DEFAULT_SCAN_ID};
pub use control::{ScanControl, SuspendReason};
pub use error::{CheckpointError, ConfigError, PublishError, ScanError};
pub use markers::{Linger, MarkerKind, MarkerSink, NoMarkers};
pub use publish::{BusPublisher, ZoneMessage, ZonePublisher, ZONE_TOPIC};
pub use scanner::{ScanOutcome, Scanner};
pub use session::{run_scan, ScanReport, StartMode};
pub use state::ScanState;
pub use store::{CheckpointSlot, CheckpointStore, FileStore, MemoryStore};

#[cfg(test)]
mod tests;
