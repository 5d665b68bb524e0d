use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crate::closer::{close_remaining, finish_column};
use crate::labeler::ColumnLabels;
use crate::union_find::ComponentRegistry;
use terrain::prelude::{HeightmapGenerator, TerrainOracle, XZCoords};

use super::{label_region, plateaus, region, terraces};

fn c(x: i32, z: i32) -> XZCoords {
    XZCoords::new(x, z)
}

/// Labels a small grid given as columns of heights starting at (0, 0).
fn label_columns(columns: &[&[i32]]) -> (ComponentRegistry, ColumnLabels, Vec<Vec<XZCoords>>) {
    let mut registry = ComponentRegistry::new();
    let mut labels = ColumnLabels::new();
    let mut closed = Vec::new();
    for (x, column) in columns.iter().enumerate() {
        labels.begin_column();
        for (z, &h) in column.iter().enumerate() {
            labels.label_cell(&mut registry, c(x as i32, z as i32), h);
        }
        closed.push(
            finish_column(&mut registry, &mut labels)
                .into_iter()
                .map(|comp| comp.members().to_vec())
                .collect::<Vec<_>>()
                .concat(),
        );
    }
    (registry, labels, closed)
}

#[test]
fn test_merges_up_within_column() {
    let (mut registry, _, _) = label_columns(&[&[5, 5, 5]]);
    let root = registry.find(c(0, 0));
    assert_eq!(registry.find(c(0, 2)), root);
    assert_eq!(registry.component(root).unwrap().len(), 3);
}

#[test]
fn test_merges_left_across_columns() {
    let (mut registry, _, _) = label_columns(&[&[5], &[5], &[5]]);
    let root = registry.find(c(2, 0));
    assert_eq!(registry.find(c(0, 0)), root);
}

#[test]
fn test_different_heights_stay_apart() {
    let (mut registry, _, _) = label_columns(&[&[5, 6], &[6, 5]]);
    let roots: HashSet<XZCoords> = [c(0, 0), c(0, 1), c(1, 0), c(1, 1)]
        .into_iter()
        .map(|cell| registry.find(cell))
        .collect();
    // Diagonal neighbours are not connected.
    assert_eq!(roots.len(), 4);
}

#[test]
fn test_current_label_tracks_rows() {
    let mut registry = ComponentRegistry::new();
    let mut labels = ColumnLabels::new();
    labels.begin_column();
    labels.label_cell(&mut registry, c(0, 0), 1);
    let root = labels.label_cell(&mut registry, c(0, 1), 1);

    assert_eq!(labels.current_label(1), Some(root));
    assert_eq!(labels.current_label(2), None);
}

#[test]
fn test_column_closes_untouched_components() {
    // Column 0: rows 0 and 1 at different heights; column 1 only continues row 0.
    let (_, labels, closed) = label_columns(&[&[1, 2], &[1, 3]]);

    assert!(closed[0].is_empty(), "nothing can close after the first column");
    assert_eq!(closed[1], vec![c(0, 1)]);
    assert_eq!(labels.active_roots().len(), 2);
}

#[test]
fn test_close_remaining_flushes_everything() {
    let (mut registry, mut labels, _) = label_columns(&[&[1, 1], &[1, 2]]);
    let rest = close_remaining(&mut registry, &mut labels);

    let sizes: Vec<usize> = rest.iter().map(|comp| comp.members().len()).collect();
    assert_eq!(sizes.iter().sum::<usize>(), 4);
    assert!(registry.open_components().is_empty());
    assert_eq!(labels, ColumnLabels::new());
}

#[test]
fn test_closure_order_follows_root() {
    let (mut registry, mut labels, _) = label_columns(&[&[1, 2, 3]]);
    let roots: Vec<XZCoords> = close_remaining(&mut registry, &mut labels).iter().map(|comp| comp.root).collect();
    assert_eq!(roots, vec![c(0, 0), c(0, 1), c(0, 2)]);
}

/// Flood fill over the disc with 4-neighbour moves between equal heights.
fn flood_components(region: &crate::config::ScanRegion, terrain: &impl TerrainOracle) -> BTreeSet<BTreeSet<XZCoords>> {
    let mut heights = HashMap::new();
    for x in region.min_x()..=region.max_x() {
        for z in region.min_z()..=region.max_z() {
            let cell = c(x, z);
            if region.contains(cell) {
                heights.insert(cell, terrain.height(cell).unwrap());
            }
        }
    }

    let mut seen = HashSet::new();
    let mut components = BTreeSet::new();
    for (&start, &h) in &heights {
        if !seen.insert(start) {
            continue;
        }
        let mut members = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for next in [c(cell.x + 1, cell.z), c(cell.x - 1, cell.z), c(cell.x, cell.z + 1), c(cell.x, cell.z - 1)] {
                if heights.get(&next) == Some(&h) && seen.insert(next) {
                    members.insert(next);
                    queue.push_back(next);
                }
            }
        }
        components.insert(members);
    }
    components
}

fn labeled_components(region: &crate::config::ScanRegion, terrain: &impl TerrainOracle) -> BTreeSet<BTreeSet<XZCoords>> {
    label_region(region, terrain)
        .iter()
        .map(|comp| comp.members().iter().copied().collect())
        .collect()
}

#[test]
fn test_matches_flood_fill_on_noise_terrain() {
    let region = region(40, -25, 14);
    let terrain = HeightmapGenerator::new(7).with_terrace(3);
    assert_eq!(labeled_components(&region, &terrain), flood_components(&region, &terrain));
}

#[test]
fn test_matches_flood_fill_on_merging_terraces() {
    let region = region(0, 0, 9);
    assert_eq!(labeled_components(&region, &terraces), flood_components(&region, &terraces));
}

#[test]
fn test_closed_components_are_final() {
    let region = region(2, 3, 10);
    let closed = label_region(&region, &plateaus);

    let mut seen = HashSet::new();
    for comp in &closed {
        for &cell in comp.members() {
            assert!(seen.insert(cell), "{cell} closed twice");
            assert_eq!(plateaus(cell), comp.height());
        }
    }
    let disc = (region.min_x()..=region.max_x())
        .flat_map(|x| (region.min_z()..=region.max_z()).map(move |z| c(x, z)))
        .filter(|&cell| region.contains(cell))
        .count();
    assert_eq!(seen.len(), disc);
}
