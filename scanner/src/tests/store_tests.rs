use std::fs;
use std::path::PathBuf;

use crate::checkpoint::ScanCheckpoint;
use crate::control::SuspendReason;
use crate::state::ScanState;
use crate::store::{has_checkpoint_file, CheckpointSlot, CheckpointStore, FileStore, MemoryStore};
use terrain::prelude::XZCoords;

use super::{flat, init_logger, paused_state, region};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("flatzone-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn test_memory_store_roundtrip() {
    let mut store = MemoryStore::new();
    assert_eq!(store.load("a").unwrap(), None);

    store.save("a", b"one").unwrap();
    store.save("a", b"two").unwrap();
    assert_eq!(store.load("a").unwrap(), Some(b"two".to_vec()));

    store.remove("a").unwrap();
    store.remove("a").unwrap();
    assert_eq!(store.load("a").unwrap(), None);
}

#[test]
fn test_file_store_roundtrip() {
    let dir = scratch_dir("file-store");
    let mut store = FileStore::new(&dir);
    assert_eq!(store.path_for("scout"), dir.join("scout.json"));
    assert_eq!(store.load("scout").unwrap(), None);
    assert!(!has_checkpoint_file(&dir, "scout"));

    store.save("scout", b"{\"a\":1}").unwrap();
    store.save("scout", b"{\"a\":2}").unwrap();
    assert!(has_checkpoint_file(&dir, "scout"));
    assert!(!dir.join("scout.json.tmp").exists());
    assert_eq!(store.load("scout").unwrap(), Some(b"{\"a\":2}".to_vec()));

    store.remove("scout").unwrap();
    store.remove("scout").unwrap();
    assert_eq!(store.load("scout").unwrap(), None);

    let _ = fs::remove_dir_all(&dir);
}

fn saved_slot() -> (CheckpointSlot<MemoryStore>, ScanState) {
    let (state, _) = paused_state(flat, region(0, 0, 4), 30);
    let mut slot = CheckpointSlot::new(MemoryStore::new(), "scout");
    slot.save(&ScanCheckpoint::capture(&state, &region(0, 0, 4), SuspendReason::Pause)).unwrap();
    (slot, state)
}

#[test]
fn test_slot_restores_saved_state() {
    init_logger();
    let (slot, state) = saved_slot();

    assert_eq!(slot.load(&region(0, 0, 4)).unwrap(), Some(state.clone()));
    assert_eq!(slot.restore(&region(0, 0, 4)), state);

    let status = slot.status().unwrap();
    assert_eq!(status.reason, SuspendReason::Pause);
    assert_eq!(Some(status.cursor), state.cursor());
}

#[test]
fn test_slot_restore_falls_back_to_fresh() {
    init_logger();
    let (mut slot, _) = saved_slot();

    // Region changed since the checkpoint was taken.
    assert_eq!(slot.restore(&region(0, 0, 5)), ScanState::new());

    slot.store_mut().save("scout", b"{ truncated").unwrap();
    assert!(slot.load(&region(0, 0, 4)).is_err());
    assert_eq!(slot.restore(&region(0, 0, 4)), ScanState::new());
    assert!(slot.status().is_none());

    slot.clear().unwrap();
    assert_eq!(slot.load(&region(0, 0, 4)).unwrap(), None);
    assert!(!slot.restore(&region(0, 0, 4)).has_state());
}

#[test]
fn test_slots_are_keyed_by_scan_id() {
    let dir = scratch_dir("slots");
    let (state, _) = paused_state(flat, region(3, 3, 2), 7);
    let checkpoint = ScanCheckpoint::capture(&state, &region(3, 3, 2), SuspendReason::Pause);

    let mut scout = CheckpointSlot::new(FileStore::new(&dir), "scout");
    scout.save(&checkpoint).unwrap();
    let other = CheckpointSlot::new(FileStore::new(&dir), "other");

    assert_eq!(scout.key(), "scout");
    assert_eq!(scout.status().map(|s| s.cursor), state.cursor());
    assert!(other.status().is_none());
    assert_eq!(other.restore(&region(3, 3, 2)), ScanState::new());
    assert_eq!(scout.restore(&region(3, 3, 2)).cursor(), Some(XZCoords::new(2, 3)));

    let _ = fs::remove_dir_all(&dir);
}
