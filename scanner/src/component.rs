// src/component.rs

use terrain::prelude::XZCoords;

/// Tight inclusive bounding box of a set of columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_z: i32,
    pub max_z: i32,
}

impl Bounds {
    pub fn point(cell: XZCoords) -> Self {
        Self { min_x: cell.x, max_x: cell.x, min_z: cell.z, max_z: cell.z }
    }

    pub fn union(&self, other: &Bounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_z: self.min_z.min(other.min_z),
            max_z: self.max_z.max(other.max_z),
        }
    }

    pub fn include(&mut self, cell: XZCoords) {
        *self = self.union(&Bounds::point(cell));
    }

    /// Tight box around `cells`, `None` when there are none.
    pub fn enclosing<'a>(cells: impl IntoIterator<Item = &'a XZCoords>) -> Option<Self> {
        let mut cells = cells.into_iter();
        let mut bounds = Bounds::point(*cells.next()?);
        for cell in cells {
            bounds.include(*cell);
        }
        Some(bounds)
    }

    /// Extent along x.
    pub fn width(&self) -> usize {
        (self.max_x - self.min_x + 1) as usize
    }

    /// Extent along z.
    pub fn length(&self) -> usize {
        (self.max_z - self.min_z + 1) as usize
    }
}

/// A connected set of equal-height columns that may still grow.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub bounds: Bounds,
    pub height: i32,
    pub members: Vec<XZCoords>,
}

impl Component {
    pub fn singleton(cell: XZCoords, height: i32) -> Self {
        Self { bounds: Bounds::point(cell), height, members: vec![cell] }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Folds `other` into `self`. Heights must already match.
    pub(crate) fn absorb(&mut self, mut other: Component) {
        self.bounds = self.bounds.union(&other.bounds);
        self.members.append(&mut other.members);
    }
}

/// A component the scan has moved past; its membership is final.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosedComponent {
    pub root: XZCoords,
    component: Component,
}

impl ClosedComponent {
    pub(crate) fn new(root: XZCoords, component: Component) -> Self {
        Self { root, component }
    }

    pub fn bounds(&self) -> Bounds {
        self.component.bounds
    }

    pub fn height(&self) -> i32 {
        self.component.height
    }

    pub fn members(&self) -> &[XZCoords] {
        &self.component.members
    }
}

#[cfg(test)]
impl ClosedComponent {
    /// Builds a closed component straight from a member list.
    pub(crate) fn from_members(height: i32, members: Vec<XZCoords>) -> Self {
        let root = members.first().copied().unwrap_or(XZCoords::new(0, 0));
        let bounds = Bounds::enclosing(&members).unwrap_or(Bounds::point(root));
        Self { root, component: Component { bounds, height, members } }
    }
}
