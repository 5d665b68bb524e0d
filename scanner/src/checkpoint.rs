// src/checkpoint.rs

//! Flat, persistable form of a [`ScanState`].
//!
//! The encoding is fixed rather than inferred on load:
//! - a coordinate used as a map key is the string `"x,z"`,
//! - a coordinate used as a value or list item is the array `[x, z]`,
//! - a row index is a plain integer key.
//!
//! Loading validates the structure as a whole. A checkpoint that decodes but
//! does not describe a state the scan could have produced is rejected.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};
use terrain::prelude::{ParseCoordsError, XZCoords};

use crate::component::{Bounds, Component};
use crate::config::ScanRegion;
use crate::control::SuspendReason;
use crate::error::CheckpointError;
use crate::labeler::ColumnLabels;
use crate::state::ScanState;
use crate::union_find::ComponentRegistry;

pub const CHECKPOINT_VERSION: u32 = 1;

/// Coordinate as a `"x,z"` map key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellKey(pub XZCoords);

impl TryFrom<String> for CellKey {
    type Error = ParseCoordsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse().map(CellKey)
    }
}

impl From<CellKey> for String {
    fn from(key: CellKey) -> Self {
        key.0.to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentRecord {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
    pub h: i32,
    pub coords: Vec<[i32; 2]>,
}

impl ComponentRecord {
    fn bounds(&self) -> Bounds {
        Bounds { min_x: self.min_x, max_x: self.max_x, min_z: self.min_z, max_z: self.max_z }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScanCheckpoint {
    pub version: u32,
    pub center: [i32; 2],
    pub radius: i32,
    pub reason: SuspendReason,
    pub has_state: bool,
    pub parent: BTreeMap<CellKey, [i32; 2]>,
    pub stats: BTreeMap<CellKey, ComponentRecord>,
    pub prev_col_labels: BTreeMap<i32, [i32; 2]>,
    pub curr_col_labels: BTreeMap<i32, [i32; 2]>,
    pub active_roots: Vec<[i32; 2]>,
    pub active_roots_this_col: Vec<[i32; 2]>,
    pub resume_x: i32,
    pub resume_z: i32,
}

/// Summary of a stored checkpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CheckpointStatus {
    pub reason: SuspendReason,
    pub cursor: XZCoords,
    pub open_components: usize,
    pub visited_cells: usize,
}

fn sorted_pairs<'a>(cells: impl Iterator<Item = &'a XZCoords>) -> Vec<[i32; 2]> {
    let mut pairs: Vec<[i32; 2]> = cells.map(|c| c.to_pair()).collect();
    pairs.sort_unstable();
    pairs
}

impl ScanCheckpoint {
    /// Snapshots `state`, including the partially scanned column.
    pub fn capture(state: &ScanState, region: &ScanRegion, reason: SuspendReason) -> Self {
        let cursor = state.cursor.unwrap_or(XZCoords::new(region.min_x(), region.min_z()));
        let registry = &state.registry;
        let labels = &state.labels;

        let parent = registry
            .parent_map()
            .iter()
            .map(|(&cell, &up)| (CellKey(cell), up.to_pair()))
            .collect();

        let stats = registry
            .open_components()
            .iter()
            .map(|(&root, c)| {
                let record = ComponentRecord {
                    min_x: c.bounds.min_x,
                    max_x: c.bounds.max_x,
                    min_z: c.bounds.min_z,
                    max_z: c.bounds.max_z,
                    h: c.height,
                    coords: c.members.iter().map(|m| m.to_pair()).collect(),
                };
                (CellKey(root), record)
            })
            .collect();

        Self {
            version: CHECKPOINT_VERSION,
            center: region.center.to_pair(),
            radius: region.radius,
            reason,
            has_state: state.has_state(),
            parent,
            stats,
            prev_col_labels: labels.prev.iter().map(|(&row, c)| (row, c.to_pair())).collect(),
            curr_col_labels: labels.curr.iter().map(|(&row, c)| (row, c.to_pair())).collect(),
            active_roots: sorted_pairs(labels.active.iter()),
            active_roots_this_col: sorted_pairs(labels.active_this.iter()),
            resume_x: cursor.x,
            resume_z: cursor.z,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, CheckpointError> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CheckpointError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn cursor(&self) -> XZCoords {
        XZCoords::new(self.resume_x, self.resume_z)
    }

    pub fn status(&self) -> CheckpointStatus {
        CheckpointStatus {
            reason: self.reason,
            cursor: self.cursor(),
            open_components: self.stats.len(),
            visited_cells: self.parent.len(),
        }
    }

    /// Rebuilds the live state for a scan over `region`, or explains why
    /// this checkpoint can't be trusted.
    pub fn into_state(self, region: &ScanRegion) -> Result<ScanState, CheckpointError> {
        if self.version != CHECKPOINT_VERSION {
            return Err(CheckpointError::Version { expected: CHECKPOINT_VERSION, found: self.version });
        }
        let center = XZCoords::from(self.center);
        if center != region.center || self.radius != region.radius {
            return Err(CheckpointError::RegionMismatch {
                center: region.center,
                radius: region.radius,
                found_center: center,
                found_radius: self.radius,
            });
        }
        if self.reason != SuspendReason::Pause {
            return Err(CheckpointError::NotResumable);
        }
        if !self.has_state {
            return Err(CheckpointError::invalid("checkpoint carries no scan state"));
        }
        let cursor = self.cursor();
        if !region.in_square(cursor) {
            return Err(CheckpointError::invalid(format!("resume cursor {cursor} lies outside the region")));
        }

        let parent: HashMap<XZCoords, XZCoords> =
            self.parent.into_iter().map(|(cell, up)| (cell.0, XZCoords::from(up))).collect();
        let chains = ParentChains::check(&parent, region)?;

        let mut stats = HashMap::with_capacity(self.stats.len());
        let mut seen = HashSet::new();
        for (key, record) in self.stats {
            let root = key.0;
            if parent.get(&root) != Some(&root) {
                return Err(CheckpointError::invalid(format!("component key {root} is not a root")));
            }
            let members: Vec<XZCoords> = record.coords.iter().copied().map(XZCoords::from).collect();
            for &member in &members {
                if chains.root_of(member) != Some(root) {
                    return Err(CheckpointError::invalid(format!("member {member} does not resolve to {root}")));
                }
                if !seen.insert(member) {
                    return Err(CheckpointError::invalid(format!("member {member} is listed twice")));
                }
            }
            match Bounds::enclosing(&members) {
                Some(bounds) if bounds == record.bounds() => {}
                Some(_) => return Err(CheckpointError::invalid(format!("bounds of {root} are not tight"))),
                None => return Err(CheckpointError::invalid(format!("component {root} has no members"))),
            }
            stats.insert(root, Component { bounds: record.bounds(), height: record.h, members });
        }

        // Every visited cell under an open root must be listed by it.
        let mut visited: HashMap<XZCoords, usize> = HashMap::new();
        for &cell in parent.keys() {
            if let Some(root) = chains.root_of(cell).filter(|root| stats.contains_key(root)) {
                *visited.entry(root).or_default() += 1;
            }
        }
        for (root, component) in &stats {
            let count = visited.get(root).copied().unwrap_or(0);
            if count != component.members.len() {
                return Err(CheckpointError::invalid(format!(
                    "component {root} lists {} members but {count} visited cells resolve to it",
                    component.members.len()
                )));
            }
        }

        let open = |cell: XZCoords| -> Result<XZCoords, CheckpointError> {
            match chains.root_of(cell) {
                Some(root) if stats.contains_key(&root) => Ok(root),
                _ => Err(CheckpointError::invalid(format!("{cell} does not belong to an open component"))),
            }
        };

        let mut labels = ColumnLabels::new();
        for (row, cell) in self.prev_col_labels {
            if !(region.min_z()..=region.max_z()).contains(&row) {
                return Err(CheckpointError::invalid(format!("previous-column row {row} is outside the region")));
            }
            let cell = XZCoords::from(cell);
            open(cell)?;
            labels.prev.insert(row, cell);
        }
        for (row, cell) in self.curr_col_labels {
            if !(region.min_z()..cursor.z).contains(&row) {
                return Err(CheckpointError::invalid(format!("current-column row {row} is not behind the cursor")));
            }
            let cell = XZCoords::from(cell);
            open(cell)?;
            labels.curr.insert(row, cell);
        }

        let mut tracked = HashSet::new();
        for cell in self.active_roots.into_iter().map(XZCoords::from) {
            tracked.insert(open(cell)?);
            labels.active.insert(cell);
        }
        for cell in self.active_roots_this_col.into_iter().map(XZCoords::from) {
            tracked.insert(open(cell)?);
            labels.active_this.insert(cell);
        }
        if let Some(root) = stats.keys().find(|root| !tracked.contains(*root)) {
            return Err(CheckpointError::invalid(format!("open component {root} is not tracked by any column")));
        }

        let registry = ComponentRegistry::from_parts(parent, stats);
        Ok(ScanState::from_parts(registry, labels, cursor))
    }
}

/// Read-only view of a decoded parent map whose chains are known to end.
struct ParentChains<'a> {
    parent: &'a HashMap<XZCoords, XZCoords>,
}

impl<'a> ParentChains<'a> {
    fn check(parent: &'a HashMap<XZCoords, XZCoords>, region: &ScanRegion) -> Result<Self, CheckpointError> {
        let chains = Self { parent };
        for (&cell, &up) in parent {
            if !region.contains(cell) {
                return Err(CheckpointError::invalid(format!("{cell} lies outside the scanned disc")));
            }
            if !parent.contains_key(&up) {
                return Err(CheckpointError::invalid(format!("{cell} points at unknown parent {up}")));
            }
            if chains.root_of(cell).is_none() {
                return Err(CheckpointError::invalid(format!("parent chain from {cell} does not end")));
            }
        }
        Ok(chains)
    }

    fn root_of(&self, cell: XZCoords) -> Option<XZCoords> {
        let mut node = cell;
        for _ in 0..=self.parent.len() {
            let up = *self.parent.get(&node)?;
            if up == node {
                return Some(node);
            }
            node = up;
        }
        None
    }
}
