// src/union_find.rs

use std::collections::HashMap;

use terrain::prelude::XZCoords;

use crate::component::{ClosedComponent, Component};

/// Union-find over column coordinates, with per-root component stats.
///
/// `parent` keeps every coordinate ever registered, including those of
/// components that were closed and taken out of `stats`, so `find` stays
/// answerable for the whole scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentRegistry {
    parent: HashMap<XZCoords, XZCoords>,
    stats: HashMap<XZCoords, Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(parent: HashMap<XZCoords, XZCoords>, stats: HashMap<XZCoords, Component>) -> Self {
        Self { parent, stats }
    }

    pub(crate) fn parent_map(&self) -> &HashMap<XZCoords, XZCoords> {
        &self.parent
    }

    /// Registers `cell` as a singleton of height `h` unless it is already known.
    pub fn create(&mut self, cell: XZCoords, h: i32) -> XZCoords {
        if !self.parent.contains_key(&cell) {
            self.parent.insert(cell, cell);
            self.stats.insert(cell, Component::singleton(cell, h));
        }
        cell
    }

    pub fn contains(&self, cell: XZCoords) -> bool {
        self.parent.contains_key(&cell)
    }

    /// Root of `cell`, compressing the path behind it.
    pub fn find(&mut self, cell: XZCoords) -> XZCoords {
        let mut root = cell;
        while let Some(&next) = self.parent.get(&root) {
            if next == root {
                break;
            }
            root = next;
        }

        let mut node = cell;
        while node != root {
            match self.parent.insert(node, root) {
                Some(next) => node = next,
                None => break,
            }
        }
        root
    }

    /// Merges the components of `a` and `b` and returns the surviving root.
    ///
    /// Both must have the same height. The larger component survives; on a
    /// tie the root of `b` does.
    pub fn union(&mut self, a: XZCoords, b: XZCoords) -> XZCoords {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return root_b;
        }
        debug_assert_eq!(
            self.height_of(root_a),
            self.height_of(root_b),
            "union across heights at {} / {}",
            root_a,
            root_b
        );

        let size_a = self.stats.get(&root_a).map_or(0, Component::len);
        let size_b = self.stats.get(&root_b).map_or(0, Component::len);
        let (absorbed, survivor) = if size_a > size_b { (root_b, root_a) } else { (root_a, root_b) };

        self.parent.insert(absorbed, survivor);
        if let Some(gone) = self.stats.remove(&absorbed) {
            if let Some(kept) = self.stats.get_mut(&survivor) {
                kept.absorb(gone);
            }
        }
        survivor
    }

    pub fn height_of(&self, root: XZCoords) -> Option<i32> {
        self.stats.get(&root).map(|c| c.height)
    }

    pub fn component(&self, root: XZCoords) -> Option<&Component> {
        self.stats.get(&root)
    }

    /// Still-open components keyed by root.
    pub fn open_components(&self) -> &HashMap<XZCoords, Component> {
        &self.stats
    }

    /// Removes the component rooted at `root`, closing it.
    pub fn take(&mut self, root: XZCoords) -> Option<ClosedComponent> {
        self.stats.remove(&root).map(|c| ClosedComponent::new(root, c))
    }

    /// Number of coordinates ever registered.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}
