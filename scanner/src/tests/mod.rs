mod labeler_tests;
mod store_tests;

use terrain::prelude::{TerrainOracle, XZCoords, Zone};

use crate::closer::{close_remaining, finish_column};
use crate::component::ClosedComponent;
use crate::config::{ScanConfig, ScanRegion};
use crate::control::ScanControl;
use crate::labeler::ColumnLabels;
use crate::scanner::{ScanOutcome, Scanner};
use crate::state::ScanState;
use crate::union_find::ComponentRegistry;

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub(crate) fn flat(_: XZCoords) -> i32 {
    64
}

pub(crate) fn checkerboard(cell: XZCoords) -> i32 {
    64 + (cell.x + cell.z).rem_euclid(2)
}

/// Height 64 up to x = 0, 70 east of it.
pub(crate) fn split(cell: XZCoords) -> i32 {
    if cell.x <= 0 {
        64
    } else {
        70
    }
}

/// 4x4 plateaus, every one at its own height.
pub(crate) fn plateaus(cell: XZCoords) -> i32 {
    10 * cell.x.div_euclid(4) + cell.z.div_euclid(4)
}

/// 3x4 blocks on five levels, so neighbouring blocks often share a height
/// and merge into irregular components.
pub(crate) fn terraces(cell: XZCoords) -> i32 {
    (cell.x.div_euclid(3) * 7 + cell.z.div_euclid(4) * 3).rem_euclid(5)
}

pub(crate) fn region(x: i32, z: i32, radius: i32) -> ScanRegion {
    ScanRegion { center: XZCoords::new(x, z), radius }
}

/// Labels and closes every column of `region` without going through the
/// scanner, returning components in closure order.
pub(crate) fn label_region(region: &ScanRegion, terrain: &impl TerrainOracle) -> Vec<ClosedComponent> {
    let mut registry = ComponentRegistry::new();
    let mut labels = ColumnLabels::new();
    let mut closed = Vec::new();

    for x in region.min_x()..=region.max_x() {
        labels.begin_column();
        for z in region.min_z()..=region.max_z() {
            let cell = XZCoords::new(x, z);
            if region.contains(cell) {
                let h = terrain.height(cell).unwrap();
                labels.label_cell(&mut registry, cell, h);
            }
        }
        closed.extend(finish_column(&mut registry, &mut labels));
    }
    closed.extend(close_remaining(&mut registry, &mut labels));
    closed
}

/// Runs a scan that pauses after `polls` cursor positions, returning the
/// suspended state and the zones emitted before the pause.
pub(crate) fn paused_state<T: TerrainOracle>(
    terrain: T,
    region: ScanRegion,
    polls: u64,
) -> (ScanState, Vec<Zone>) {
    let config = ScanConfig::new(region.center, region.radius).unwrap();
    let control = ScanControl::new();
    control.pause_after(polls);

    let mut scanner = Scanner::new(config, terrain, Vec::<Zone>::new()).with_control(control);
    let mut state = ScanState::new();
    let outcome = futures::executor::block_on(scanner.run(&mut state)).unwrap();
    assert!(matches!(outcome, ScanOutcome::Suspended { .. }), "scan finished before pausing");

    let (zones, _) = scanner.into_parts();
    (state, zones)
}

/// Zones of an uninterrupted scan.
pub(crate) fn full_scan<T: TerrainOracle>(terrain: T, region: ScanRegion) -> Vec<Zone> {
    let config = ScanConfig::new(region.center, region.radius).unwrap();
    let mut scanner = Scanner::new(config, terrain, Vec::<Zone>::new());
    let mut state = ScanState::new();
    let outcome = futures::executor::block_on(scanner.run(&mut state)).unwrap();
    assert!(outcome.is_complete());
    scanner.into_parts().0
}
