// src/store.rs

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::checkpoint::{CheckpointStatus, ScanCheckpoint};
use crate::config::ScanRegion;
use crate::error::CheckpointError;
use crate::state::ScanState;

/// Opaque key-value blob persistence for checkpoints.
pub trait CheckpointStore {
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<(), CheckpointError>;

    /// `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CheckpointError>;

    fn remove(&mut self, key: &str) -> Result<(), CheckpointError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointStore for MemoryStore {
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<(), CheckpointError> {
        self.blobs.insert(key.to_string(), blob.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CheckpointError> {
        Ok(self.blobs.get(key).cloned())
    }

    fn remove(&mut self, key: &str) -> Result<(), CheckpointError> {
        self.blobs.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per scan identity inside a directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CheckpointStore for FileStore {
    /// Writes `<key>.json.tmp`, syncs it, then renames it over the old file so
    /// a crash mid-write leaves the previous checkpoint intact.
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<(), CheckpointError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");

        let mut file = File::create(&tmp)?;
        file.write_all(blob)?;
        file.sync_all()?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, CheckpointError> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), CheckpointError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// A store bound to one scan identity.
pub struct CheckpointSlot<S> {
    store: S,
    key: String,
}

impl<S: CheckpointStore> CheckpointSlot<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self { store, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn save(&mut self, checkpoint: &ScanCheckpoint) -> Result<(), CheckpointError> {
        let blob = checkpoint.encode()?;
        self.store.save(&self.key, &blob)
    }

    pub fn clear(&mut self) -> Result<(), CheckpointError> {
        self.store.remove(&self.key)
    }

    /// Decodes and validates the stored checkpoint without touching it.
    pub fn load(&self, region: &ScanRegion) -> Result<Option<ScanState>, CheckpointError> {
        match self.store.load(&self.key)? {
            Some(blob) => ScanCheckpoint::decode(&blob)?.into_state(region).map(Some),
            None => Ok(None),
        }
    }

    /// State to resume `region` from. Never fails: a missing checkpoint, or
    /// one that can't be read or trusted, yields a fresh state and the scan
    /// starts over from the first cell.
    pub fn restore(&self, region: &ScanRegion) -> ScanState {
        match self.load(region) {
            Ok(Some(state)) => {
                if let Some(cursor) = state.cursor() {
                    info!("[{}] resuming scan from {} ({} open components)", self.key, cursor, state.open_components());
                }
                state
            }
            Ok(None) => {
                info!("[{}] no checkpoint, starting a fresh scan", self.key);
                ScanState::new()
            }
            Err(e) => {
                warn!("[{}] discarding checkpoint: {}", self.key, e);
                ScanState::new()
            }
        }
    }

    /// Cursor and size of the stored checkpoint, if one decodes.
    pub fn status(&self) -> Option<CheckpointStatus> {
        let blob = self.store.load(&self.key).ok()??;
        ScanCheckpoint::decode(&blob).ok().map(|c| c.status())
    }
}

/// Whether `dir` already holds a checkpoint file for `key`.
pub fn has_checkpoint_file(dir: &Path, key: &str) -> bool {
    FileStore::new(dir).path_for(key).is_file()
}
