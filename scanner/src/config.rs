// src/config.rs

use terrain::prelude::XZCoords;

use crate::error::ConfigError;

/// Scan radius used when the caller does not pick one.
pub const DEFAULT_RADIUS: i32 = 15;
/// Upper bound on the radius; keeps the per-scan maps in the low millions.
pub const MAX_RADIUS: i32 = 1024;
pub const DEFAULT_SCAN_ID: &str = "explorer";

/// The disc of columns a scan covers, iterated over its bounding square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanRegion {
    pub center: XZCoords,
    pub radius: i32,
}

impl ScanRegion {
    pub fn min_x(&self) -> i32 {
        self.center.x - self.radius
    }

    pub fn max_x(&self) -> i32 {
        self.center.x + self.radius
    }

    pub fn min_z(&self) -> i32 {
        self.center.z - self.radius
    }

    pub fn max_z(&self) -> i32 {
        self.center.z + self.radius
    }

    /// Inside the bounding square, masked or not.
    pub fn in_square(&self, cell: XZCoords) -> bool {
        (self.min_x()..=self.max_x()).contains(&cell.x) && (self.min_z()..=self.max_z()).contains(&cell.z)
    }

    /// Inside the circular mask.
    pub fn contains(&self, cell: XZCoords) -> bool {
        let r = self.radius as i64;
        cell.distance_sq(self.center) <= r * r
    }

    /// Number of cursor positions (masked cells included) in the square.
    pub fn square_cells(&self) -> usize {
        let side = (2 * self.radius + 1) as usize;
        side * side
    }
}

/// What happens to in-progress state when a scan is stopped rather than paused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StopPolicy {
    #[default]
    Discard,
    /// Keep the snapshot for inspection. It is never resumed.
    Checkpoint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanConfig {
    pub region: ScanRegion,
    /// Identity the checkpoint is stored under.
    pub scan_id: String,
    pub stop_policy: StopPolicy,
}

impl ScanConfig {
    pub fn new(center: XZCoords, radius: i32) -> Result<Self, ConfigError> {
        if !(1..=MAX_RADIUS).contains(&radius) {
            return Err(ConfigError::Radius { radius, max: MAX_RADIUS });
        }
        Ok(Self {
            region: ScanRegion { center, radius },
            scan_id: DEFAULT_SCAN_ID.to_string(),
            stop_policy: StopPolicy::default(),
        })
    }

    pub fn with_scan_id(mut self, scan_id: impl Into<String>) -> Result<Self, ConfigError> {
        let scan_id = scan_id.into();
        if scan_id.trim().is_empty() {
            return Err(ConfigError::EmptyScanId);
        }
        self.scan_id = scan_id;
        Ok(self)
    }

    pub fn with_stop_policy(mut self, policy: StopPolicy) -> Self {
        self.stop_policy = policy;
        self
    }
}
