//! Consumers of published snapshots.

use std::sync::{Arc, Mutex};

use crate::snapshot::Snapshot;

/// Receives every snapshot the scheduler publishes.
///
/// Called synchronously after each completed cycle, so implementations must
/// return quickly.
pub trait SnapshotListener: Send + Sync {
    fn on_snapshot(&self, snapshot: &Snapshot);
}

/// Listener that ignores every snapshot.
#[derive(Clone, Default)]
pub struct NoOpSnapshotListener;

impl SnapshotListener for NoOpSnapshotListener {
    fn on_snapshot(&self, _snapshot: &Snapshot) {}
}

/// Mock listener for testing - collects published snapshots.
#[derive(Clone, Default)]
pub struct MockSnapshotListener {
    snapshots: Arc<Mutex<Vec<Snapshot>>>,
}

impl MockSnapshotListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<Snapshot> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.snapshots.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.lock().unwrap().is_empty()
    }
}

impl SnapshotListener for MockSnapshotListener {
    fn on_snapshot(&self, snapshot: &Snapshot) {
        self.snapshots.lock().unwrap().push(snapshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Fields;

    #[test]
    fn test_mock_listener_collects_snapshots() {
        let listener = MockSnapshotListener::new();
        assert!(listener.is_empty());

        listener.on_snapshot(&Snapshot::new(Fields::new(), false, None));
        listener.on_snapshot(&Snapshot::new(Fields::new(), true, None));
        assert_eq!(listener.len(), 2);
        assert!(listener.snapshots()[1].is_using_cache());

        NoOpSnapshotListener.on_snapshot(&Snapshot::new(Fields::new(), false, None));
    }
}
