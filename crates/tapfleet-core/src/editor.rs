// ── Single-port editor ──
//
// Edits one port on one device. The working copy starts as the stored
// port; saving submits the whole working copy as a patch through the
// batch engine with a one-entry target list. Dropping the editor
// discards the edit.

use std::sync::Arc;

use tracing::debug;

use crate::engine::{self, BatchOutcome};
use crate::error::CoreError;
use crate::model::{DeviceId, Port, PortId, PortRef};
use crate::patch::ConfigPatch;
use crate::store::{DeviceStore, StorageSlot};

/// An in-progress edit of one port.
#[derive(Debug, Clone)]
pub struct PortEditor {
    target: PortRef,
    original: Arc<Port>,
    working: Port,
}

impl PortEditor {
    /// Start editing `port_id` on `device_id`.
    pub fn open<S: StorageSlot>(
        store: &DeviceStore<S>,
        device_id: &DeviceId,
        port_id: PortId,
    ) -> Result<Self, CoreError> {
        let device = store
            .device(device_id)
            .ok_or_else(|| CoreError::DeviceNotFound {
                identifier: device_id.to_string(),
            })?;
        let original = device
            .port(port_id)
            .map(Arc::clone)
            .ok_or_else(|| CoreError::PortNotFound {
                device: device_id.clone(),
                port: port_id,
            })?;

        debug!(device = %device_id, port = port_id, "editor opened");
        Ok(Self {
            target: PortRef::new(device_id.clone(), port_id),
            working: (*original).clone(),
            original,
        })
    }

    pub fn target(&self) -> &PortRef {
        &self.target
    }

    /// The port as it was when the editor opened.
    pub fn original(&self) -> &Port {
        &self.original
    }

    pub fn working(&self) -> &Port {
        &self.working
    }

    /// Change the working copy. The port id cannot be changed.
    pub fn edit(&mut self, f: impl FnOnce(&mut Port)) {
        f(&mut self.working);
        self.working.id = self.target.port_id;
    }

    /// Overlay `patch` onto the working copy.
    pub fn apply(&mut self, patch: &ConfigPatch) {
        self.working = patch.apply(&self.working);
    }

    pub fn is_dirty(&self) -> bool {
        self.working != *self.original
    }

    /// The full-port patch `save` submits.
    pub fn patch(&self) -> ConfigPatch {
        ConfigPatch::from_port(&self.working)
    }

    /// Validate and write the working copy to its own device.
    pub fn save<S: StorageSlot>(self, store: &mut DeviceStore<S>) -> Result<BatchOutcome, CoreError> {
        let outcome = engine::commit_refs(store, std::slice::from_ref(&self.target), &self.patch())?;
        if outcome.devices_updated == 0 {
            // The device or port vanished since the editor opened.
            return Err(CoreError::PortNotFound {
                device: self.target.device_id,
                port: self.target.port_id,
            });
        }
        Ok(outcome)
    }
}
