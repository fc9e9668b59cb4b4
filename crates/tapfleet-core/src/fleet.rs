// ── Fleet facade ──
//
// Owns the device store and the selection set, and is the boundary a view
// layer talks to. Rejects empty batch commits before they reach the
// engine, and re-checks the selection against the store after every write.

use std::sync::Arc;

use tracing::{debug, info};

use crate::command::{Command, CommandResult};
use crate::editor::PortEditor;
use crate::engine::{self, BatchOutcome};
use crate::error::CoreError;
use crate::model::{DeviceId, PortId, PortRef};
use crate::patch::ConfigPatch;
use crate::selection::{SelectionChange, SelectionSet};
use crate::stats::FleetOverview;
use crate::store::{DeviceStore, StorageSlot};
use crate::stream::DeviceStream;

pub struct Fleet<S: StorageSlot> {
    store: DeviceStore<S>,
    selection: SelectionSet,
}

impl<S: StorageSlot> Fleet<S> {
    /// Load the store from `slot` and start with an empty single-mode
    /// selection.
    pub fn open(slot: S) -> Result<Self, CoreError> {
        Ok(Self::new(DeviceStore::load(slot)?))
    }

    pub fn new(store: DeviceStore<S>) -> Self {
        Self {
            store,
            selection: SelectionSet::new(),
        }
    }

    pub fn store(&self) -> &DeviceStore<S> {
        &self.store
    }

    pub fn subscribe(&self) -> DeviceStream {
        self.store.subscribe()
    }

    // ── Selection ────────────────────────────────────────────────────

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    /// Click on a port. Ports that do not exist are ignored.
    pub fn toggle(&mut self, device_id: &DeviceId, port_id: PortId) -> Option<SelectionChange> {
        let exists = self
            .store
            .device(device_id)
            .is_some_and(|d| d.has_port(port_id));
        if !exists {
            debug!(device = %device_id, port = port_id, "toggle ignored: no such port");
            return None;
        }
        Some(self.selection.toggle(device_id.clone(), port_id))
    }

    pub fn enter_multi_select(&mut self) {
        self.selection.enter_multi();
    }

    pub fn exit_multi_select(&mut self) {
        self.selection.enter_single();
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Apply `patch` to the current selection.
    pub fn commit_batch(&mut self, patch: &ConfigPatch) -> Result<BatchOutcome, CoreError> {
        if self.selection.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        let outcome = engine::commit(&mut self.store, &mut self.selection, patch)?;
        self.prune_selection();
        Ok(outcome)
    }

    /// Open an editor on one port and make it the single-mode target.
    pub fn open_editor(&mut self, device_id: &DeviceId, port_id: PortId) -> Result<PortEditor, CoreError> {
        let editor = PortEditor::open(&self.store, device_id, port_id)?;
        if !self.selection.is_multi() {
            self.selection.toggle(device_id.clone(), port_id);
        }
        Ok(editor)
    }

    pub fn save_editor(&mut self, editor: PortEditor) -> Result<BatchOutcome, CoreError> {
        let outcome = editor.save(&mut self.store)?;
        self.prune_selection();
        Ok(outcome)
    }

    pub fn execute(&mut self, command: Command) -> Result<CommandResult, CoreError> {
        let result = match command {
            Command::ApplyPatch { targets, patch } => {
                if targets.is_empty() {
                    return Err(CoreError::EmptySelection);
                }
                CommandResult::Applied(engine::commit_refs(&mut self.store, &targets, &patch)?)
            }
            Command::UpdatePort { device_id, port } => {
                let target = PortRef::new(device_id, port.id);
                let outcome = engine::commit_refs(
                    &mut self.store,
                    std::slice::from_ref(&target),
                    &ConfigPatch::from_port(&port),
                )?;
                if outcome.devices_updated == 0 {
                    return Err(CoreError::PortNotFound {
                        device: target.device_id,
                        port: target.port_id,
                    });
                }
                CommandResult::Applied(outcome)
            }
            Command::ResetStore => {
                let devices = self.store.reset()?;
                info!(devices, "store reset");
                CommandResult::Reset { devices }
            }
        };
        self.prune_selection();
        Ok(result)
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn overview(&self) -> FleetOverview {
        let snapshot = self.store.snapshot();
        FleetOverview::of(snapshot.iter().map(Arc::as_ref))
    }

    fn prune_selection(&mut self) {
        let snapshot = self.store.snapshot();
        self.selection.retain_existing(&snapshot);
    }
}
