// src/scanner.rs

use futures_lite::future::yield_now;
use log::{error, info};
use terrain::prelude::{TerrainOracle, XZCoords};

use crate::closer::{close_remaining, finish_column};
use crate::component::ClosedComponent;
use crate::config::ScanConfig;
use crate::control::{ScanControl, SuspendReason};
use crate::emitter::ZoneEmitter;
use crate::error::ScanError;
use crate::markers::{Linger, MarkerKind, MarkerSink, NoMarkers};
use crate::publish::ZonePublisher;
use crate::state::ScanState;

/// How a scan run ended, short of an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Every cell was visited and every component flushed.
    Completed { zones: usize, cells: usize },
    /// Gave up the cursor at `cursor`, which has not been visited yet.
    Suspended { reason: SuspendReason, cursor: XZCoords, zones: usize, cells: usize },
}

impl ScanOutcome {
    /// Zones published during this run.
    pub fn zones(&self) -> usize {
        match *self {
            ScanOutcome::Completed { zones, .. } | ScanOutcome::Suspended { zones, .. } => zones,
        }
    }

    /// Cells measured during this run.
    pub fn cells(&self) -> usize {
        match *self {
            ScanOutcome::Completed { cells, .. } | ScanOutcome::Suspended { cells, .. } => cells,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, ScanOutcome::Completed { .. })
    }
}

/// Drives the raster scan: x columns outer, z rows inner, over the disc.
pub struct Scanner<T, P, M = NoMarkers> {
    config: ScanConfig,
    terrain: T,
    publisher: P,
    markers: M,
    control: ScanControl,
    emitter: ZoneEmitter,
}

impl<T, P> Scanner<T, P, NoMarkers>
where
    T: TerrainOracle,
    P: ZonePublisher,
{
    pub fn new(config: ScanConfig, terrain: T, publisher: P) -> Self {
        Self {
            config,
            terrain,
            publisher,
            markers: NoMarkers,
            control: ScanControl::new(),
            emitter: ZoneEmitter::new(),
        }
    }
}

impl<T, P, M> Scanner<T, P, M>
where
    T: TerrainOracle,
    P: ZonePublisher,
    M: MarkerSink,
{
    pub fn with_markers<N: MarkerSink>(self, markers: N) -> Scanner<T, P, N> {
        Scanner {
            config: self.config,
            terrain: self.terrain,
            publisher: self.publisher,
            markers,
            control: self.control,
            emitter: self.emitter,
        }
    }

    pub fn with_control(mut self, control: ScanControl) -> Self {
        self.control = control;
        self
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn control(&self) -> &ScanControl {
        &self.control
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    pub fn markers(&self) -> &M {
        &self.markers
    }

    pub fn into_parts(self) -> (P, M) {
        (self.publisher, self.markers)
    }

    /// Scans from wherever `state` left off until the region is done or the
    /// control asks to suspend.
    ///
    /// Yields to the executor before every cell and polls the control right
    /// after, so a suspend always lands on a cell boundary with `state`
    /// consistent. On a resumed state the first column continues from the
    /// saved partial labels and row; later columns start fresh. A failed
    /// publish resets `state`, so the next run starts the region over.
    pub async fn run(&mut self, state: &mut ScanState) -> Result<ScanOutcome, ScanError> {
        let region = self.config.region;
        let (start_x, start_z, mut resuming) = match state.cursor {
            Some(cursor) => (cursor.x.max(region.min_x()), cursor.z, true),
            None => (region.min_x(), region.min_z(), false),
        };
        if resuming {
            info!(
                "[{}] resuming scan r={} around {} at x={}, z={}",
                self.config.scan_id, region.radius, region.center, start_x, start_z
            );
        } else {
            info!("[{}] scanning r={} around {}", self.config.scan_id, region.radius, region.center);
        }

        let zones_before = self.emitter.emitted();
        let mut cells = 0;

        for x in start_x..=region.max_x() {
            let first_row = if resuming {
                resuming = false;
                start_z
            } else {
                state.labels.begin_column();
                region.min_z()
            };

            let mut column_markers = Vec::new();
            for z in first_row..=region.max_z() {
                yield_now().await;

                let cell = XZCoords::new(x, z);
                if let Some(reason) = self.control.poll() {
                    state.cursor = Some(cell);
                    self.markers.release(column_markers, Linger::Scan);
                    info!("[{}] scan suspended ({:?}) at x={}, z={}", self.config.scan_id, reason, x, z);
                    return Ok(ScanOutcome::Suspended {
                        reason,
                        cursor: cell,
                        zones: self.emitter.emitted() - zones_before,
                        cells,
                    });
                }

                if !region.contains(cell) {
                    continue;
                }

                let h = match self.terrain.height(cell) {
                    Ok(h) => h,
                    Err(source) => {
                        error!("[{}] terrain query failed at {}: {}", self.config.scan_id, cell, source);
                        state.cursor = Some(cell);
                        self.markers.release(column_markers, Linger::Scan);
                        return Err(ScanError::Terrain { cell, source });
                    }
                };

                let marker = cell.at_height(h);
                self.markers.place(marker, MarkerKind::Scanned);
                column_markers.push(marker);

                state.labels.label_cell(&mut state.registry, cell, h);
                cells += 1;
            }
            self.markers.release(column_markers, Linger::Scan);

            let closed = finish_column(&mut state.registry, &mut state.labels);
            self.emit_all(state, closed).await?;
        }

        let closed = close_remaining(&mut state.registry, &mut state.labels);
        self.emit_all(state, closed).await?;
        state.reset();

        let zones = self.emitter.emitted() - zones_before;
        info!("[{}] scan complete: {} zones from {} cells", self.config.scan_id, zones, cells);
        Ok(ScanOutcome::Completed { zones, cells })
    }

    /// Publishes a closure batch in order.
    ///
    /// The batch has already been taken out of the registry, so on a failed
    /// publish `state` can't be continued and is reset to a fresh scan.
    async fn emit_all(&mut self, state: &mut ScanState, closed: Vec<ClosedComponent>) -> Result<(), ScanError> {
        for component in &closed {
            if let Err(e) = self.emitter.emit(component, &mut self.publisher, &mut self.markers).await {
                error!(
                    "[{}] zone publication failed at {}: {}; scan state reset",
                    self.config.scan_id,
                    component.root,
                    e
                );
                state.reset();
                return Err(ScanError::Publish(e));
            }
        }
        Ok(())
    }
}
