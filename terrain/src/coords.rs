// src/coords.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Column position on the XZ plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct XZCoords {
    pub x: i32,
    pub z: i32,
}

impl XZCoords {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Block position at height `y` on top of this column.
    pub fn at_height(&self, y: i32) -> BlockPos {
        BlockPos { x: self.x, y, z: self.z }
    }

    /// Squared euclidean distance, widened so large regions can't overflow.
    pub fn distance_sq(&self, other: XZCoords) -> i64 {
        let dx = (self.x as i64) - (other.x as i64);
        let dz = (self.z as i64) - (other.z as i64);
        dx * dx + dz * dz
    }

    pub fn to_pair(self) -> [i32; 2] {
        [self.x, self.z]
    }
}

impl From<[i32; 2]> for XZCoords {
    fn from([x, z]: [i32; 2]) -> Self {
        Self { x, z }
    }
}

impl From<(i32, i32)> for XZCoords {
    fn from((x, z): (i32, i32)) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for XZCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.z)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coordinate key {0:?}, expected \"x,z\"")]
pub struct ParseCoordsError(pub String);

impl FromStr for XZCoords {
    type Err = ParseCoordsError;

    /// Parses the `"x,z"` form produced by `Display`. Nothing else is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ParseCoordsError(s.to_string());
        let (x, z) = s.split_once(',').ok_or_else(bad)?;
        let x = x.parse::<i32>().map_err(|_| bad())?;
        let z = z.parse::<i32>().map_err(|_| bad())?;
        Ok(Self { x, z })
    }
}

/// A single block in the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn column(&self) -> XZCoords {
        XZCoords { x: self.x, z: self.z }
    }
}
