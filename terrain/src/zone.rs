// src/zone.rs

use serde::{Deserialize, Serialize};

use crate::coords::XZCoords;

/// A flat rectangle of equal-height columns, ready for placing a structure on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Zone {
    /// Corner with the smallest x and z.
    pub origin: XZCoords,
    pub width: u32,
    pub length: u32,
    pub center: XZCoords,
    pub height: i32,
    pub blocks: Vec<XZCoords>,
}

impl Zone {
    pub fn new(origin: XZCoords, width: u32, length: u32, height: i32) -> Self {
        let center = XZCoords::new(origin.x + (width / 2) as i32, origin.z + (length / 2) as i32);
        let mut blocks = Vec::with_capacity((width * length) as usize);
        for dz in 0..length as i32 {
            for dx in 0..width as i32 {
                blocks.push(XZCoords::new(origin.x + dx, origin.z + dz));
            }
        }
        Self { origin, width, length, center, height, blocks }
    }

    pub fn area(&self) -> u32 {
        self.width * self.length
    }

    pub fn max_corner(&self) -> XZCoords {
        XZCoords::new(self.origin.x + self.width as i32 - 1, self.origin.z + self.length as i32 - 1)
    }

    pub fn contains(&self, cell: XZCoords) -> bool {
        let max = self.max_corner();
        cell.x >= self.origin.x && cell.x <= max.x && cell.z >= self.origin.z && cell.z <= max.z
    }
}
