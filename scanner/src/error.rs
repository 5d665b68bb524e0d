// src/error.rs

use terrain::prelude::{TerrainError, XZCoords};
use thiserror::Error;

/// Rejected scan configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("radius must be between 1 and {max}, got {radius}")]
    Radius { radius: i32, max: i32 },

    #[error("scan id must not be empty")]
    EmptyScanId,
}

/// The zone bus refused a submission.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("zone bus is disconnected")]
    Disconnected,

    #[error("zone bus rejected the message: {0}")]
    Rejected(String),
}

/// Failure to persist, read or trust a checkpoint.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("checkpoint I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("checkpoint is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("checkpoint version {found} is not supported (expected {expected})")]
    Version { expected: u32, found: u32 },

    #[error("checkpoint belongs to region {found_center} r={found_radius}, not {center} r={radius}")]
    RegionMismatch {
        center: XZCoords,
        radius: i32,
        found_center: XZCoords,
        found_radius: i32,
    },

    #[error("checkpoint was taken by a stop and cannot be resumed")]
    NotResumable,

    #[error("checkpoint is structurally invalid: {0}")]
    Invalid(String),
}

impl CheckpointError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::Invalid(reason.into())
    }
}

/// Anything that ends a scan run early other than a suspend request.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("terrain oracle failed at {cell}")]
    Terrain {
        cell: XZCoords,
        #[source]
        source: TerrainError,
    },

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Checkpoint(#[from] CheckpointError),
}
