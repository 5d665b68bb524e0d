// src/oracle.rs

use thiserror::Error;

use crate::coords::XZCoords;

#[derive(Debug, Error)]
pub enum TerrainError {
    /// The column lies outside what the world can currently answer for.
    #[error("column {0} is not available")]
    Unavailable(XZCoords),
}

/// Answers "how high is the surface at this column".
///
/// Calls are blocking from the caller's point of view and are made once per
/// scanned cell.
pub trait TerrainOracle {
    fn height(&self, cell: XZCoords) -> Result<i32, TerrainError>;
}

impl<F> TerrainOracle for F
where
    F: Fn(XZCoords) -> i32,
{
    fn height(&self, cell: XZCoords) -> Result<i32, TerrainError> {
        Ok(self(cell))
    }
}
