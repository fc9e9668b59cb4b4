// ── Field relevance ──
//
// Some port fields only mean something when another field has a given
// value: `allowedVlans` under trunk mode, PoE details with PoE on, storm
// thresholds with storm control on. Forms use these predicates to decide
// what to show. The merge engine never consults them.

use crate::model::{Port, VlanMode};
use crate::patch::{ConfigPatch, PortField};

/// The condition under which a conditional field is meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGuard {
    /// `vlanMode` is `trunk`.
    TrunkMode,
    /// `poeEnabled` is true.
    PoeEnabled,
    /// `stormControl` is true.
    StormControl,
}

impl FieldGuard {
    /// The field whose value decides the guard.
    pub fn field(self) -> PortField {
        match self {
            Self::TrunkMode => PortField::VlanMode,
            Self::PoeEnabled => PortField::PoeEnabled,
            Self::StormControl => PortField::StormControl,
        }
    }

    pub fn holds_for_port(self, port: &Port) -> bool {
        match self {
            Self::TrunkMode => port.vlan_mode == Some(VlanMode::Trunk),
            Self::PoeEnabled => port.poe_enabled,
            Self::StormControl => port.storm_control_enabled(),
        }
    }

    pub fn holds_for_patch(self, patch: &ConfigPatch) -> bool {
        match self {
            Self::TrunkMode => patch.vlan_mode == Some(Some(VlanMode::Trunk)),
            Self::PoeEnabled => patch.poe_enabled == Some(true),
            Self::StormControl => patch.storm_control == Some(Some(true)),
        }
    }
}

impl PortField {
    /// The guard this field depends on, if it is conditional.
    pub fn guard(self) -> Option<FieldGuard> {
        match self {
            Self::AllowedVlans => Some(FieldGuard::TrunkMode),
            Self::PoePriority | Self::PoeMaxPower | Self::PoeType => Some(FieldGuard::PoeEnabled),
            Self::BroadcastThreshold | Self::MulticastThreshold => Some(FieldGuard::StormControl),
            _ => None,
        }
    }
}

/// Whether `field` is meaningful given the rest of `port`.
pub fn is_relevant(port: &Port, field: PortField) -> bool {
    field.guard().is_none_or(|guard| guard.holds_for_port(port))
}

/// Every field a single-port form should show for `port`.
pub fn relevant_fields(port: &Port) -> Vec<PortField> {
    use strum::IntoEnumIterator;
    PortField::iter().filter(|f| is_relevant(port, *f)).collect()
}

/// Batch-form rule: a conditional field is shown only when the patch being
/// built sets its guard. Target ports are not consulted.
pub fn is_visible_in_patch(patch: &ConfigPatch, field: PortField) -> bool {
    field.guard().is_none_or(|guard| guard.holds_for_patch(patch))
}
