// src/labeler.rs

use std::collections::{HashMap, HashSet};

use terrain::prelude::XZCoords;

use crate::union_find::ComponentRegistry;

/// Per-column labeling state carried between cells and columns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnLabels {
    /// Row -> label, for the last completed column.
    pub(crate) prev: HashMap<i32, XZCoords>,
    /// Row -> label, for the column being scanned.
    pub(crate) curr: HashMap<i32, XZCoords>,
    /// Roots alive as of the last completed column.
    pub(crate) active: HashSet<XZCoords>,
    /// Roots touched so far in the column being scanned.
    pub(crate) active_this: HashSet<XZCoords>,
}

impl ColumnLabels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_column(&mut self) {
        self.curr.clear();
        self.active_this.clear();
    }

    /// Labels `cell` at height `h`, merging it left (previous column, same
    /// row) and up (this column, row above) when the heights match.
    pub fn label_cell(&mut self, registry: &mut ComponentRegistry, cell: XZCoords, h: i32) -> XZCoords {
        let mut current = registry.create(cell, h);

        if let Some(&left) = self.prev.get(&cell.z) {
            let root_left = registry.find(left);
            if registry.height_of(root_left) == Some(h) {
                current = registry.union(current, root_left);
            }
        }

        if let Some(&up) = self.curr.get(&(cell.z - 1)) {
            let root_up = registry.find(up);
            if registry.height_of(root_up) == Some(h) {
                current = registry.union(current, root_up);
            }
        }

        let root = registry.find(current);
        self.curr.insert(cell.z, root);
        self.active_this.insert(root);
        root
    }

    /// Label recorded for `row` in the column being scanned.
    pub fn current_label(&self, row: i32) -> Option<XZCoords> {
        self.curr.get(&row).copied()
    }

    pub fn active_roots(&self) -> &HashSet<XZCoords> {
        &self.active
    }
}
