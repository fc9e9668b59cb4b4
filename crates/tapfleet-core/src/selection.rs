// ── Selection set ──
//
// Tracks which (device, port) pairs are chosen for editing. Single mode
// holds at most one entry, the port opened in the editor; multi mode is a
// true set with toggle semantics. Any mode switch clears the set.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use indexmap::IndexSet;
use tracing::warn;

use crate::model::{Device, DeviceId, PortId, PortRef};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    #[default]
    Single,
    Multi,
}

/// What a [`SelectionSet::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Single mode: the port became the editing target.
    Activated,
    /// Multi mode: the port joined the set.
    Added,
    /// Multi mode: the port left the set.
    Removed,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionSet {
    mode: SelectionMode,
    entries: IndexSet<PortRef>,
}

impl SelectionSet {
    /// An empty selection in single mode.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty selection in multi mode.
    pub fn multi() -> Self {
        Self {
            mode: SelectionMode::Multi,
            entries: IndexSet::new(),
        }
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn is_multi(&self) -> bool {
        self.mode == SelectionMode::Multi
    }

    /// Switch mode. Entering either mode discards the prior selection.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        self.entries.clear();
    }

    pub fn enter_multi(&mut self) {
        self.set_mode(SelectionMode::Multi);
    }

    pub fn enter_single(&mut self) {
        self.set_mode(SelectionMode::Single);
    }

    /// React to a click on a port.
    pub fn toggle(&mut self, device_id: impl Into<DeviceId>, port_id: PortId) -> SelectionChange {
        let entry = PortRef::new(device_id, port_id);
        match self.mode {
            SelectionMode::Single => {
                self.entries.clear();
                self.entries.insert(entry);
                SelectionChange::Activated
            }
            SelectionMode::Multi => {
                if self.entries.shift_remove(&entry) {
                    SelectionChange::Removed
                } else {
                    self.entries.insert(entry);
                    SelectionChange::Added
                }
            }
        }
    }

    pub fn contains(&self, device_id: &DeviceId, port_id: PortId) -> bool {
        self.entries.iter().any(|e| e.device_id == *device_id && e.port_id == port_id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The single-mode editing target.
    pub fn active(&self) -> Option<&PortRef> {
        match self.mode {
            SelectionMode::Single => self.entries.first(),
            SelectionMode::Multi => None,
        }
    }

    /// Iterate the entries. Order is not meaningful to the merge step.
    pub fn iter(&self) -> impl Iterator<Item = &PortRef> {
        self.entries.iter()
    }

    /// Port ids per device, each list sorted and free of duplicates.
    pub fn group_by_device(&self) -> BTreeMap<DeviceId, BTreeSet<PortId>> {
        group_refs(self.entries.iter())
    }

    /// Drop entries whose device or port is gone from `devices`.
    /// Returns how many entries were removed.
    pub fn retain_existing(&mut self, devices: &[Arc<Device>]) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            let exists = devices
                .iter()
                .find(|d| d.id == entry.device_id)
                .is_some_and(|d| d.has_port(entry.port_id));
            if !exists {
                warn!(port = %entry, "dropping stale selection entry");
            }
            exists
        });
        before - self.entries.len()
    }
}

/// Group arbitrary port references by device.
pub fn group_refs<'a>(
    refs: impl IntoIterator<Item = &'a PortRef>,
) -> BTreeMap<DeviceId, BTreeSet<PortId>> {
    let mut groups: BTreeMap<DeviceId, BTreeSet<PortId>> = BTreeMap::new();
    for entry in refs {
        groups
            .entry(entry.device_id.clone())
            .or_default()
            .insert(entry.port_id);
    }
    groups
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{Port, PortStatus, PowerStatus};

    fn id(raw: &str) -> DeviceId {
        DeviceId::from(raw)
    }

    #[test]
    fn starts_empty_in_single_mode() {
        let sel = SelectionSet::new();
        assert_eq!(sel.mode(), SelectionMode::Single);
        assert_eq!(sel.count(), 0);
        assert!(sel.active().is_none());
    }

    #[test]
    fn single_mode_replaces_the_target() {
        let mut sel = SelectionSet::new();
        assert_eq!(sel.toggle("switch-001", 1), SelectionChange::Activated);
        assert_eq!(sel.toggle("switch-002", 4), SelectionChange::Activated);
        assert_eq!(sel.count(), 1);
        assert_eq!(sel.active(), Some(&PortRef::new("switch-002", 4)));
        assert!(!sel.contains(&id("switch-001"), 1));

        // Clicking the active port again keeps it active.
        sel.toggle("switch-002", 4);
        assert_eq!(sel.count(), 1);
    }

    #[test]
    fn multi_mode_toggles_membership() {
        let mut sel = SelectionSet::multi();
        assert_eq!(sel.toggle("switch-002", 1), SelectionChange::Added);
        assert_eq!(sel.toggle("switch-002", 3), SelectionChange::Added);
        assert_eq!(sel.toggle("switch-002", 1), SelectionChange::Removed);
        assert!(!sel.contains(&id("switch-002"), 1));
        assert!(sel.contains(&id("switch-002"), 3));
        assert_eq!(sel.count(), 1);
        assert!(sel.active().is_none());
    }

    #[test]
    fn toggle_twice_is_an_involution() {
        let mut sel = SelectionSet::multi();
        sel.toggle("switch-001", 10);
        let before: Vec<PortRef> = sel.iter().cloned().collect();

        sel.toggle("switch-003", 2);
        sel.toggle("switch-003", 2);
        let after: Vec<PortRef> = sel.iter().cloned().collect();
        assert_eq!(before, after);

        sel.toggle("switch-001", 10);
        sel.toggle("switch-001", 10);
        assert!(sel.contains(&id("switch-001"), 10));
    }

    #[test]
    fn mode_switches_clear_the_set() {
        let mut sel = SelectionSet::new();
        sel.toggle("switch-001", 1);
        sel.enter_multi();
        assert!(sel.is_empty());

        sel.toggle("switch-001", 1);
        sel.toggle("switch-001", 2);
        sel.enter_single();
        assert!(sel.is_empty());
        assert_eq!(sel.mode(), SelectionMode::Single);
    }

    #[test]
    fn groups_entries_by_device() {
        let mut sel = SelectionSet::multi();
        sel.toggle("switch-003", 2);
        sel.toggle("switch-001", 10);
        sel.toggle("switch-001", 4);

        let groups = sel.group_by_device();
        assert_eq!(groups.len(), 2);
        assert_eq!(
            groups[&id("switch-001")].iter().copied().collect::<Vec<_>>(),
            vec![4, 10]
        );
        assert_eq!(groups[&id("switch-003")].len(), 1);
    }

    #[test]
    fn retain_existing_prunes_stale_entries() {
        let device = Arc::new(Device {
            id: id("switch-001"),
            name: "a".into(),
            model: "m".into(),
            ip: "10.0.0.1".into(),
            mac: "00-00-00-00-00-01".into(),
            version: "v".into(),
            power_status: PowerStatus::On,
            max_power: 10.0,
            current_power: 1.0,
            ports: vec![Arc::new(Port::new(1, "p1", PortStatus::Connected))],
        });

        let mut sel = SelectionSet::multi();
        sel.toggle("switch-001", 1);
        sel.toggle("switch-001", 2);
        sel.toggle("switch-404", 1);

        assert_eq!(sel.retain_existing(&[device]), 2);
        assert_eq!(sel.count(), 1);
        assert!(sel.contains(&id("switch-001"), 1));
    }
}
