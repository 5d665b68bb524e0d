// src/state.rs

use terrain::prelude::XZCoords;

use crate::labeler::ColumnLabels;
use crate::union_find::ComponentRegistry;

/// Everything a scan needs to continue exactly where it left off.
///
/// Owned by one scan at a time and passed into it by `&mut`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanState {
    pub(crate) registry: ComponentRegistry,
    pub(crate) labels: ColumnLabels,
    /// Next cell to visit; `None` for a scan that has not started.
    pub(crate) cursor: Option<XZCoords>,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(registry: ComponentRegistry, labels: ColumnLabels, cursor: XZCoords) -> Self {
        Self { registry, labels, cursor: Some(cursor) }
    }

    /// Whether this state carries progress to resume from.
    pub fn has_state(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn cursor(&self) -> Option<XZCoords> {
        self.cursor
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn labels(&self) -> &ColumnLabels {
        &self.labels
    }

    pub fn open_components(&self) -> usize {
        self.registry.open_components().len()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
