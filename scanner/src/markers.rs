// src/markers.rs

use terrain::prelude::BlockPos;

/// Number of distinct zone marker colours before the palette repeats.
pub const ZONE_PALETTE_SIZE: u8 = 14;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MarkerKind {
    /// A column the scan has just measured.
    Scanned,
    /// A column covered by an emitted zone, `color < ZONE_PALETTE_SIZE`.
    Zone { color: u8 },
}

/// Which kind of batch is being released. Only a hint; each sink decides
/// when a released batch is actually cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Linger {
    /// Scan markers of a finished column. Short lived.
    Scan,
    /// Markers of a published zone. Meant to stay up longer than scan markers.
    Zone,
}

/// Write-only visual feedback. Nothing here is ever read back by the scan.
pub trait MarkerSink {
    fn place(&mut self, pos: BlockPos, kind: MarkerKind);

    fn clear(&mut self, pos: BlockPos);

    /// Hands a snapshot of placed markers off for later removal. The batch is
    /// owned by the sink from here on; the default clears it right away.
    fn release(&mut self, batch: Vec<BlockPos>, linger: Linger) {
        let _ = linger;
        for pos in batch {
            self.clear(pos);
        }
    }
}

/// Sink for headless scans.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoMarkers;

impl MarkerSink for NoMarkers {
    fn place(&mut self, _pos: BlockPos, _kind: MarkerKind) {}

    fn clear(&mut self, _pos: BlockPos) {}

    fn release(&mut self, _batch: Vec<BlockPos>, _linger: Linger) {}
}
