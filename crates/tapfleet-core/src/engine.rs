// ── Batch merge engine ──
//
// Applies one ConfigPatch to every selected port. The patch is validated
// once before anything is touched; the selection is grouped by device and
// each affected device is rebuilt with its selected ports merged and every
// other port shared with the previous value. All rebuilt devices go to the
// store in a single `replace_all`, so per-device updates in one batch
// cannot overwrite each other.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::model::{Device, DeviceId, PortId, PortRef};
use crate::patch::ConfigPatch;
use crate::selection::{SelectionSet, group_refs};
use crate::store::{DeviceStore, StorageSlot};

/// One device as it will look after the batch.
#[derive(Debug, Clone)]
pub struct DeviceUpdate {
    pub device: Device,
    /// Selected port ids that exist on the device, ascending.
    pub ports: Vec<PortId>,
    /// How many of those ports actually change.
    pub changed: usize,
}

/// The full effect of a batch, computed without touching the store.
#[derive(Debug, Clone, Default)]
pub struct BatchPlan {
    pub updates: Vec<DeviceUpdate>,
    /// Selection entries naming a device or port that does not exist.
    pub skipped: Vec<PortRef>,
}

impl BatchPlan {
    pub fn ports_targeted(&self) -> usize {
        self.updates.iter().map(|u| u.ports.len()).sum()
    }
}

/// What a committed batch did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchOutcome {
    /// Devices written back to the store.
    pub devices_updated: usize,
    /// Ports the patch was applied to.
    pub ports_updated: usize,
    pub skipped: Vec<PortRef>,
}

/// Compute the devices a batch over `selection` would produce.
///
/// Pure: validation errors are returned before any merging, and nothing
/// outside the returned plan is modified.
pub fn plan(
    devices: &[Arc<Device>],
    selection: &SelectionSet,
    patch: &ConfigPatch,
) -> Result<BatchPlan, CoreError> {
    plan_groups(devices, &selection.group_by_device(), patch)
}

/// [`plan`] over port ids already grouped by device.
pub fn plan_groups(
    devices: &[Arc<Device>],
    groups: &BTreeMap<DeviceId, BTreeSet<PortId>>,
    patch: &ConfigPatch,
) -> Result<BatchPlan, CoreError> {
    patch.validate()?;

    let mut out = BatchPlan::default();
    for (device_id, port_ids) in groups {
        let Some(device) = devices.iter().find(|d| d.id == *device_id) else {
            warn!(device = %device_id, "batch targets unknown device");
            out.skipped
                .extend(port_ids.iter().map(|&p| PortRef::new(device_id.clone(), p)));
            continue;
        };

        for &missing in port_ids.iter().filter(|&&p| !device.has_port(p)) {
            warn!(device = %device_id, port = missing, "batch targets unknown port");
            out.skipped.push(PortRef::new(device_id.clone(), missing));
        }

        if let Some(update) = merge_device(device, port_ids, patch) {
            out.updates.push(update);
        }
    }
    Ok(out)
}

/// Rebuild one device with `port_ids` merged. `None` if none of the ids
/// exist on the device.
pub fn merge_device(
    device: &Device,
    port_ids: &BTreeSet<PortId>,
    patch: &ConfigPatch,
) -> Option<DeviceUpdate> {
    let mut hit = Vec::new();
    let mut changed = 0;
    let ports = device
        .ports
        .iter()
        .map(|port| {
            if !port_ids.contains(&port.id) {
                return Arc::clone(port);
            }
            hit.push(port.id);
            let merged = patch.apply_shared(port);
            if !Arc::ptr_eq(&merged, port) {
                changed += 1;
            }
            merged
        })
        .collect();

    if hit.is_empty() {
        return None;
    }
    Some(DeviceUpdate {
        device: device.with_ports(ports),
        ports: hit,
        changed,
    })
}

/// Apply `patch` to every port in `selection` and write the result.
///
/// On success the selection is cleared and returned to single mode. On a
/// validation failure neither the store nor the selection is touched. An
/// empty selection is a no-op.
pub fn commit<S: StorageSlot>(
    store: &mut DeviceStore<S>,
    selection: &mut SelectionSet,
    patch: &ConfigPatch,
) -> Result<BatchOutcome, CoreError> {
    let outcome = apply_groups(store, &selection.group_by_device(), patch)?;
    selection.enter_single();
    Ok(outcome)
}

/// Same as [`commit`], from an explicit list of targets.
pub fn commit_refs<S: StorageSlot>(
    store: &mut DeviceStore<S>,
    targets: &[PortRef],
    patch: &ConfigPatch,
) -> Result<BatchOutcome, CoreError> {
    apply_groups(store, &group_refs(targets), patch)
}

fn apply_groups<S: StorageSlot>(
    store: &mut DeviceStore<S>,
    groups: &BTreeMap<DeviceId, BTreeSet<PortId>>,
    patch: &ConfigPatch,
) -> Result<BatchOutcome, CoreError> {
    let plan = plan_groups(&store.snapshot(), groups, patch)?;
    let ports_updated = plan.ports_targeted();

    for update in &plan.updates {
        debug!(
            device = %update.device.id,
            ports = update.ports.len(),
            changed = update.changed,
            "merged device"
        );
    }

    let devices_updated = store.replace_all(plan.updates.into_iter().map(|u| u.device))?;

    info!(
        devices = devices_updated,
        ports = ports_updated,
        skipped = plan.skipped.len(),
        fields = patch.fields().len(),
        "batch committed"
    );

    Ok(BatchOutcome {
        devices_updated,
        ports_updated,
        skipped: plan.skipped,
    })
}
