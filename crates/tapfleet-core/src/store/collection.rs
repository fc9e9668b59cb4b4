// ── Ordered reactive device collection ──
//
// Insertion-ordered storage keyed by DeviceId, with push-based change
// notification via a `watch` channel. Every mutation bumps a version
// counter and rebuilds the snapshot that subscribers receive.

use std::sync::Arc;

use indexmap::IndexMap;
use tokio::sync::watch;

use crate::model::{Device, DeviceId};

pub(crate) type Snapshot = Arc<Vec<Arc<Device>>>;

/// Single-writer device collection.
///
/// Order is the order devices were first inserted, which for a loaded
/// store is the order of the persisted array.
pub(crate) struct DeviceCollection {
    by_id: IndexMap<DeviceId, Arc<Device>>,

    /// Version counter, bumped on every mutation.
    version: watch::Sender<u64>,

    /// Full snapshot, rebuilt on every mutation.
    snapshot: watch::Sender<Snapshot>,
}

impl DeviceCollection {
    pub(crate) fn new() -> Self {
        let (version, _) = watch::channel(0);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self {
            by_id: IndexMap::new(),
            version,
            snapshot,
        }
    }

    /// Replace the whole contents, keeping subscribers attached.
    pub(crate) fn load(&mut self, devices: impl IntoIterator<Item = Arc<Device>>) {
        self.by_id = devices
            .into_iter()
            .map(|d| (d.id.clone(), d))
            .collect();
        self.publish();
    }

    /// Substitute the device with the same id, in place.
    ///
    /// Returns `false` (and changes nothing) when the id is unknown.
    pub(crate) fn replace(&mut self, device: Arc<Device>) -> bool {
        if !self.swap(device) {
            return false;
        }
        self.publish();
        true
    }

    /// Apply several replaces, publishing one snapshot at the end. Each
    /// replace sees the result of the previous one.
    pub(crate) fn replace_many(&mut self, devices: impl IntoIterator<Item = Arc<Device>>) -> usize {
        let replaced = devices.into_iter().filter(|d| self.swap(Arc::clone(d))).count();
        if replaced > 0 {
            self.publish();
        }
        replaced
    }

    pub(crate) fn get(&self, id: &DeviceId) -> Option<Arc<Device>> {
        self.by_id.get(id).map(Arc::clone)
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub(crate) fn snapshot(&self) -> Snapshot {
        self.snapshot.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot.subscribe()
    }

    pub(crate) fn version(&self) -> u64 {
        *self.version.borrow()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn swap(&mut self, device: Arc<Device>) -> bool {
        match self.by_id.get_mut(&device.id) {
            Some(slot) => {
                *slot = device;
                true
            }
            None => false,
        }
    }

    fn publish(&self) {
        let values: Vec<Arc<Device>> = self.by_id.values().map(Arc::clone).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(values));
        self.version.send_modify(|v| *v += 1);
    }
}
