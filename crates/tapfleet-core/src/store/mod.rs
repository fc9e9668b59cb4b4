// ── Device store ──
//
// Single source of truth for the device collection. Reads come from an
// in-memory collection; every write persists the whole collection to the
// storage slot (overwrite-on-save).

mod collection;
pub mod seed;
mod slot;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info};

use self::collection::DeviceCollection;
use crate::error::CoreError;
use crate::model::{Device, DeviceId};
use crate::stream::{DeviceSnapshot, DeviceStream};

pub use seed::default_fleet;
pub use slot::{DEFAULT_SLOT_KEY, FileSlot, MemorySlot, StorageSlot};

/// The device collection plus the slot it persists to.
pub struct DeviceStore<S: StorageSlot> {
    devices: DeviceCollection,
    slot: S,
}

impl<S: StorageSlot> DeviceStore<S> {
    /// Load the collection persisted in `slot`.
    ///
    /// An empty slot is seeded with [`default_fleet`] and the seed is
    /// written back before returning.
    pub fn load(mut slot: S) -> Result<Self, CoreError> {
        let devices = match slot.read()? {
            Some(raw) => {
                let devices: Vec<Device> = serde_json::from_str(&raw)?;
                check_unique_ids(&devices)?;
                debug!(slot = %slot.describe(), count = devices.len(), "loaded device collection");
                devices
            }
            None => {
                let devices = default_fleet();
                slot.write(&serde_json::to_string(&devices)?)?;
                info!(slot = %slot.describe(), count = devices.len(), "seeded empty store");
                devices
            }
        };

        let mut collection = DeviceCollection::new();
        collection.load(devices.into_iter().map(Arc::new));
        Ok(Self {
            devices: collection,
            slot,
        })
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Every device, in store order.
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.devices.snapshot()
    }

    pub fn device(&self, id: &DeviceId) -> Option<Arc<Device>> {
        self.devices.get(id)
    }

    /// Resolve a device by id, falling back to a case-insensitive name match.
    pub fn find(&self, identifier: &str) -> Result<Arc<Device>, CoreError> {
        if let Some(device) = self.device(&DeviceId::from(identifier)) {
            return Ok(device);
        }
        self.snapshot()
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(identifier))
            .map(Arc::clone)
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: identifier.to_owned(),
            })
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Bumped on every published change.
    pub fn version(&self) -> u64 {
        self.devices.version()
    }

    pub fn subscribe(&self) -> DeviceStream {
        DeviceStream::new(self.devices.subscribe())
    }

    pub fn slot(&self) -> &S {
        &self.slot
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Substitute the device with `updated.id` wholesale and persist.
    ///
    /// Returns `Ok(false)` without writing when no such device exists.
    pub fn replace(&mut self, updated: Device) -> Result<bool, CoreError> {
        let id = updated.id.clone();
        if !self.devices.replace(Arc::new(updated)) {
            debug!(device = %id, "replace ignored: unknown device");
            return Ok(false);
        }
        debug!(device = %id, "device replaced");
        self.persist()?;
        Ok(true)
    }

    /// Replace several devices against the live collection and persist once.
    ///
    /// Each replacement observes the ones before it, so no update in the
    /// batch can be lost. Unknown ids are skipped. Returns how many devices
    /// were replaced.
    pub fn replace_all(
        &mut self,
        updated: impl IntoIterator<Item = Device>,
    ) -> Result<usize, CoreError> {
        let updated: Vec<Arc<Device>> = updated.into_iter().map(Arc::new).collect();
        for device in &updated {
            if self.devices.get(&device.id).is_none() {
                debug!(device = %device.id, "replace ignored: unknown device");
            }
        }
        let replaced = self.devices.replace_many(updated);
        if replaced > 0 {
            self.persist()?;
        }
        Ok(replaced)
    }

    /// Discard the stored collection and reseed it.
    pub fn reset(&mut self) -> Result<usize, CoreError> {
        self.devices.load(default_fleet().into_iter().map(Arc::new));
        self.persist()?;
        info!(slot = %self.slot.describe(), count = self.devices.len(), "store reset to seed");
        Ok(self.devices.len())
    }

    /// The stored collection as pretty-printed JSON, in the slot format.
    pub fn export_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self.snapshot().as_ref())?)
    }

    fn persist(&mut self) -> Result<(), CoreError> {
        let raw = serde_json::to_string(self.snapshot().as_ref())?;
        self.slot.write(&raw)
    }
}

/// Device ids are unique across the collection, port ids within a device.
fn check_unique_ids(devices: &[Device]) -> Result<(), CoreError> {
    let mut device_ids = HashSet::new();
    for device in devices {
        if !device_ids.insert(&device.id) {
            return Err(CoreError::Storage {
                message: format!("duplicate device id {}", device.id),
            });
        }
        let mut port_ids = HashSet::new();
        if let Some(port) = device.ports.iter().find(|p| !port_ids.insert(p.id)) {
            return Err(CoreError::Storage {
                message: format!("duplicate port id {} on device {}", port.id, device.id),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn renamed(device: &Device, name: &str) -> Device {
        let mut out = device.clone();
        out.name = name.into();
        out
    }

    #[test]
    fn load_seeds_and_writes_back_an_empty_slot() {
        let store = DeviceStore::load(MemorySlot::new()).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.slot().write_count(), 1);

        let persisted: Vec<Device> =
            serde_json::from_str(store.slot().contents().unwrap()).unwrap();
        assert_eq!(persisted, default_fleet());
    }

    #[test]
    fn load_reads_existing_contents_without_writing() {
        let mut one = default_fleet();
        one.truncate(1);
        let slot = MemorySlot::with_contents(serde_json::to_string(&one).unwrap());

        let store = DeviceStore::load(slot).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.slot().write_count(), 0);
    }

    #[test]
    fn load_rejects_garbage() {
        let err = DeviceStore::load(MemorySlot::with_contents("{not json")).err().unwrap();
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn load_refuses_duplicate_device_ids() {
        let mut devices = default_fleet();
        let copy = renamed(&devices[0], "second copy");
        devices.push(copy);
        let raw = serde_json::to_string(&devices).unwrap();

        let err = DeviceStore::load(MemorySlot::with_contents(raw.clone())).err().unwrap();
        match err {
            CoreError::Storage { message } => assert!(message.contains("switch-001")),
            other => panic!("expected Storage, got {other:?}"),
        }

        let dir = tempfile::tempdir().unwrap();
        let mut slot = FileSlot::new(dir.path(), DEFAULT_SLOT_KEY);
        slot.write(&raw).unwrap();
        assert!(DeviceStore::load(slot).is_err());
        let on_disk = FileSlot::new(dir.path(), DEFAULT_SLOT_KEY).read().unwrap().unwrap();
        assert_eq!(on_disk, raw);
    }

    #[test]
    fn load_refuses_duplicate_port_ids() {
        let mut devices = default_fleet();
        let repeated = Arc::clone(&devices[3].ports[0]);
        devices[3].ports.push(repeated);
        let slot = MemorySlot::with_contents(serde_json::to_string(&devices).unwrap());

        let err = DeviceStore::load(slot).err().unwrap();
        match err {
            CoreError::Storage { message } => {
                assert_eq!(message, "duplicate port id 1 on device switch-004");
            }
            other => panic!("expected Storage, got {other:?}"),
        }
    }

    #[test]
    fn replace_swaps_one_device_and_persists() {
        let mut store = DeviceStore::load(MemorySlot::new()).unwrap();
        let before = store.snapshot();
        let target = store.device(&DeviceId::from("switch-002")).unwrap();

        assert!(store.replace(renamed(&target, "renamed")).unwrap());

        let after = store.snapshot();
        assert_eq!(after[1].name, "renamed");
        for i in [0, 2, 3] {
            assert!(Arc::ptr_eq(&before[i], &after[i]));
        }
        assert_eq!(store.slot().write_count(), 2);
    }

    #[test]
    fn replace_unknown_is_silent_no_op() {
        let mut store = DeviceStore::load(MemorySlot::new()).unwrap();
        let mut ghost = (*store.snapshot()[0]).clone();
        ghost.id = DeviceId::from("switch-999");

        assert!(!store.replace(ghost).unwrap());
        assert_eq!(store.slot().write_count(), 1);
        let devices: Vec<Device> = store.snapshot().iter().map(|d| (**d).clone()).collect();
        assert_eq!(devices, default_fleet());
    }

    #[test]
    fn replace_all_keeps_every_update_and_persists_once() {
        let mut store = DeviceStore::load(MemorySlot::new()).unwrap();
        let a = store.device(&DeviceId::from("switch-001")).unwrap();
        let c = store.device(&DeviceId::from("switch-003")).unwrap();

        let n = store
            .replace_all([renamed(&a, "first"), renamed(&c, "second")])
            .unwrap();
        assert_eq!(n, 2);
        assert_eq!(store.slot().write_count(), 2);

        let reloaded = DeviceStore::load(MemorySlot::with_contents(
            store.slot().contents().unwrap().to_owned(),
        ))
        .unwrap();
        assert_eq!(reloaded.snapshot()[0].name, "first");
        assert_eq!(reloaded.snapshot()[2].name, "second");
    }

    #[test]
    fn find_by_id_or_name() {
        let store = DeviceStore::load(MemorySlot::new()).unwrap();
        assert_eq!(store.find("switch-004").unwrap().name, "Edge TAP-4");
        assert_eq!(store.find("core tap-1").unwrap().id.as_str(), "switch-001");
        assert!(matches!(
            store.find("nope"),
            Err(CoreError::DeviceNotFound { .. })
        ));
    }

    #[test]
    fn reset_restores_seed() {
        let mut store = DeviceStore::load(MemorySlot::new()).unwrap();
        let target = store.snapshot()[0].clone();
        store.replace(renamed(&target, "x")).unwrap();

        assert_eq!(store.reset().unwrap(), 4);
        assert_eq!(store.snapshot()[0].name, "Core TAP-1");
    }

    #[test]
    fn file_backed_store_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = DeviceStore::load(FileSlot::new(dir.path(), DEFAULT_SLOT_KEY)).unwrap();
            let target = store.snapshot()[3].clone();
            store.replace(renamed(&target, "persisted")).unwrap();
        }
        let store = DeviceStore::load(FileSlot::new(dir.path(), DEFAULT_SLOT_KEY)).unwrap();
        assert_eq!(store.snapshot()[3].name, "persisted");
    }
}
