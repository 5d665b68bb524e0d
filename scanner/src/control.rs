// src/control.rs

use std::sync::atomic::{AtomicI64, AtomicU8, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

const RUNNING: u8 = 0;
const PAUSE: u8 = 1;
const STOP: u8 = 2;

/// Why a scan gave up the cursor before finishing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuspendReason {
    /// Resumable from the checkpoint.
    Pause,
    /// Terminal; the cursor never resumes.
    Stop,
}

/// Externally settable suspend signal, polled by the scan before every cell.
///
/// Clones share the same flag.
#[derive(Clone, Debug)]
pub struct ScanControl {
    flag: Arc<AtomicU8>,
    /// Cells left before an automatic pause, negative when unlimited.
    budget: Arc<AtomicI64>,
}

impl Default for ScanControl {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanControl {
    pub fn new() -> Self {
        Self { flag: Arc::new(AtomicU8::new(RUNNING)), budget: Arc::new(AtomicI64::new(-1)) }
    }

    pub fn pause(&self) {
        // A stop already requested wins over a later pause.
        let _ = self.flag.compare_exchange(RUNNING, PAUSE, Ordering::AcqRel, Ordering::Acquire);
    }

    pub fn stop(&self) {
        self.flag.store(STOP, Ordering::Release);
    }

    /// Lets the next run go ahead; also drops any cell budget.
    pub fn clear(&self) {
        self.budget.store(-1, Ordering::Release);
        self.flag.store(RUNNING, Ordering::Release);
    }

    /// Allows `cells` more polls to pass, then pauses.
    pub fn pause_after(&self, cells: u64) {
        self.budget.store(cells.min(i64::MAX as u64) as i64, Ordering::Release);
    }

    pub fn is_suspended(&self) -> bool {
        self.flag.load(Ordering::Acquire) != RUNNING
    }

    /// Checks the signal for the next cell, spending one unit of budget.
    pub fn poll(&self) -> Option<SuspendReason> {
        if let Some(reason) = self.requested() {
            return Some(reason);
        }
        let spent = self
            .budget
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |left| (left > 0).then(|| left - 1));
        if spent == Err(0) {
            self.pause();
            return self.requested();
        }
        None
    }

    fn requested(&self) -> Option<SuspendReason> {
        match self.flag.load(Ordering::Acquire) {
            PAUSE => Some(SuspendReason::Pause),
            STOP => Some(SuspendReason::Stop),
            _ => None,
        }
    }
}
