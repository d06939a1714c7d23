// src/storage/memory.rs
use parking_lot::Mutex;
use crate::models::snapshot::Snapshot;

/// Single-slot holder for the latest snapshot. Writers replace the whole value,
/// readers get a clone, so no reader ever sees fields from two different fetches.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    latest: Mutex<Option<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            latest: Mutex::new(None),
        }
    }

    pub fn publish(&self, snapshot: Snapshot) {
        *self.latest.lock() = Some(snapshot);
    }

    pub fn read(&self) -> Option<Snapshot> {
        self.latest.lock().clone()
    }
}
