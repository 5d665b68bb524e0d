// src/session.rs

use log::{error, info};
use terrain::prelude::{TerrainOracle, XZCoords};

use crate::checkpoint::ScanCheckpoint;
use crate::config::StopPolicy;
use crate::control::SuspendReason;
use crate::error::ScanError;
use crate::markers::MarkerSink;
use crate::publish::ZonePublisher;
use crate::scanner::{ScanOutcome, Scanner};
use crate::state::ScanState;
use crate::store::{CheckpointSlot, CheckpointStore};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StartMode {
    /// Drop whatever checkpoint exists and scan from the first cell.
    #[default]
    Fresh,
    /// Continue from the stored checkpoint, or start fresh if there is none
    /// that can be trusted.
    Resume,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScanReport {
    pub outcome: ScanOutcome,
    /// Cursor the run picked up from, `None` for a fresh start.
    pub resumed_from: Option<XZCoords>,
    /// Whether a checkpoint was left behind in the store.
    pub checkpointed: bool,
}

/// One scan run with its checkpoint kept in step.
///
/// - completed: the checkpoint is removed
/// - paused: the state is checkpointed
/// - stopped: checkpointed as non-resumable or removed, per the stop policy
///
/// A terrain or publish failure leaves the store as it was before the run.
pub async fn run_scan<T, P, M, S>(
    scanner: &mut Scanner<T, P, M>,
    slot: &mut CheckpointSlot<S>,
    mode: StartMode,
) -> Result<ScanReport, ScanError>
where
    T: TerrainOracle,
    P: ZonePublisher,
    M: MarkerSink,
    S: CheckpointStore,
{
    let region = scanner.config().region;
    let mut state = match mode {
        StartMode::Fresh => {
            slot.clear()?;
            ScanState::new()
        }
        StartMode::Resume => slot.restore(&region),
    };
    let resumed_from = state.cursor();

    let outcome = scanner.run(&mut state).await?;

    let checkpointed = match outcome {
        ScanOutcome::Completed { .. } => {
            slot.clear()?;
            false
        }
        ScanOutcome::Suspended { reason: SuspendReason::Pause, cursor, .. } => {
            save(slot, &ScanCheckpoint::capture(&state, &region, SuspendReason::Pause))?;
            info!("[{}] checkpoint saved at {}", slot.key(), cursor);
            true
        }
        ScanOutcome::Suspended { reason: SuspendReason::Stop, .. } => match scanner.config().stop_policy {
            StopPolicy::Discard => {
                slot.clear()?;
                false
            }
            StopPolicy::Checkpoint => {
                save(slot, &ScanCheckpoint::capture(&state, &region, SuspendReason::Stop))?;
                true
            }
        },
    };

    Ok(ScanReport { outcome, resumed_from, checkpointed })
}

fn save<S: CheckpointStore>(slot: &mut CheckpointSlot<S>, checkpoint: &ScanCheckpoint) -> Result<(), ScanError> {
    slot.save(checkpoint).map_err(|e| {
        error!("[{}] failed to save checkpoint: {}", slot.key(), e);
        ScanError::Checkpoint(e)
    })
}
