// src/closer.rs

use std::collections::{BTreeSet, HashSet};
use std::mem;

use log::debug;
use terrain::prelude::XZCoords;

use crate::component::ClosedComponent;
use crate::labeler::ColumnLabels;
use crate::union_find::ComponentRegistry;

/// Ends the column that was just scanned.
///
/// A root alive after the previous column that no cell of this column
/// reached can never grow again: it is closed, taken out of the registry and
/// returned in root order. The column's labels then become the previous
/// column's.
pub fn finish_column(registry: &mut ComponentRegistry, labels: &mut ColumnLabels) -> Vec<ClosedComponent> {
    let touched: HashSet<XZCoords> = labels.active_this.iter().map(|&r| registry.find(r)).collect();

    let closed_roots: BTreeSet<XZCoords> = labels
        .active
        .iter()
        .map(|&r| registry.find(r))
        .filter(|root| !touched.contains(root))
        .collect();

    let closed = take_all(registry, closed_roots);

    labels.active = touched;
    labels.active_this.clear();
    labels.prev = mem::take(&mut labels.curr);
    closed
}

/// Closes every component still alive once the last column is done.
pub fn close_remaining(registry: &mut ComponentRegistry, labels: &mut ColumnLabels) -> Vec<ClosedComponent> {
    let roots: BTreeSet<XZCoords> = labels
        .active
        .iter()
        .chain(labels.active_this.iter())
        .map(|&r| registry.find(r))
        .collect();

    let closed = take_all(registry, roots);
    *labels = ColumnLabels::default();
    closed
}

fn take_all(registry: &mut ComponentRegistry, roots: BTreeSet<XZCoords>) -> Vec<ClosedComponent> {
    let mut closed = Vec::with_capacity(roots.len());
    for root in roots {
        if let Some(component) = registry.take(root) {
            debug!(
                "closed component at {} ({} cells, h={})",
                root,
                component.members().len(),
                component.height()
            );
            closed.push(component);
        }
    }
    closed
}
