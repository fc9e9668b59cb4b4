// ── Config patches ──
//
// A `ConfigPatch` is a partial port configuration: one optional slot per
// patchable Port field. Absent slots leave the port untouched. Port fields
// that are themselves optional use a nested Option so a patch can also
// clear them (`Some(None)`, `null` on the wire).
//
// Validation covers value ranges only. Whether a field is meaningful given
// the rest of the port (e.g. `poePriority` without PoE) is a presentation
// concern, see `visibility`.

use std::ops::RangeInclusive;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, VariantNames};

use crate::error::ValidationError;
use crate::model::{InterfaceType, PoePriority, PoeType, Port, PortSpeed, PortStatus, VlanMode};
use crate::vlan::{VLAN_MAX, VLAN_MIN, VlanRanges};

pub const MTU_MIN: u32 = 64;
pub const MTU_MAX: u32 = 9216;
pub const POE_MAX_POWER_WATTS: f64 = 90.0;
pub const THRESHOLD_MAX_PCT: u32 = 100;

/// Every patchable Port field, named as on the wire. `id` is not here:
/// port ids are immutable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
    VariantNames,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PortField {
    Name,
    Status,
    Description,
    PoeEnabled,
    VlanId,
    VlanMode,
    AllowedVlans,
    NativeVlan,
    Speed,
    InterfaceType,
    PoePriority,
    PoeMaxPower,
    PoeType,
    FlowControl,
    StormControl,
    BroadcastThreshold,
    MulticastThreshold,
    Mtu,
    LoopDetection,
}

impl PortField {
    /// Whether the field may be absent on a Port (and so cleared by a patch).
    pub fn is_clearable(self) -> bool {
        !matches!(self, Self::Name | Self::Status | Self::PoeEnabled)
    }
}

/// Partial port configuration produced by a configuration form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(clippy::option_option)]
pub struct ConfigPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<PortStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poe_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub vlan_id: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub vlan_mode: Option<Option<VlanMode>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub allowed_vlans: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub native_vlan: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub speed: Option<Option<PortSpeed>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub interface_type: Option<Option<InterfaceType>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub poe_priority: Option<Option<PoePriority>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub poe_max_power: Option<Option<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub poe_type: Option<Option<PoeType>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub flow_control: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub storm_control: Option<Option<bool>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub broadcast_threshold: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub multicast_threshold: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub mtu: Option<Option<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "clearable")]
    pub loop_detection: Option<Option<bool>>,
}

// Present-but-null deserializes to `Some(None)`; a missing key never
// reaches this function and falls back to `default`.
#[allow(clippy::option_option)]
fn clearable<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl ConfigPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// The patch that sets every field to `port`'s current value.
    ///
    /// Used by the single-port editor, which submits the whole edited port.
    pub fn from_port(port: &Port) -> Self {
        Self {
            name: Some(port.name.clone()),
            status: Some(port.status),
            description: Some(port.description.clone()),
            poe_enabled: Some(port.poe_enabled),
            vlan_id: Some(port.vlan_id),
            vlan_mode: Some(port.vlan_mode),
            allowed_vlans: Some(port.allowed_vlans.clone()),
            native_vlan: Some(port.native_vlan),
            speed: Some(port.speed),
            interface_type: Some(port.interface_type),
            poe_priority: Some(port.poe_priority),
            poe_max_power: Some(port.poe_max_power),
            poe_type: Some(port.poe_type),
            flow_control: Some(port.flow_control),
            storm_control: Some(port.storm_control),
            broadcast_threshold: Some(port.broadcast_threshold),
            multicast_threshold: Some(port.multicast_threshold),
            mtu: Some(port.mtu),
            loop_detection: Some(port.loop_detection),
        }
    }

    /// Names of the fields present in this patch, in declaration order.
    pub fn fields(&self) -> Vec<PortField> {
        let present = [
            (PortField::Name, self.name.is_some()),
            (PortField::Status, self.status.is_some()),
            (PortField::Description, self.description.is_some()),
            (PortField::PoeEnabled, self.poe_enabled.is_some()),
            (PortField::VlanId, self.vlan_id.is_some()),
            (PortField::VlanMode, self.vlan_mode.is_some()),
            (PortField::AllowedVlans, self.allowed_vlans.is_some()),
            (PortField::NativeVlan, self.native_vlan.is_some()),
            (PortField::Speed, self.speed.is_some()),
            (PortField::InterfaceType, self.interface_type.is_some()),
            (PortField::PoePriority, self.poe_priority.is_some()),
            (PortField::PoeMaxPower, self.poe_max_power.is_some()),
            (PortField::PoeType, self.poe_type.is_some()),
            (PortField::FlowControl, self.flow_control.is_some()),
            (PortField::StormControl, self.storm_control.is_some()),
            (PortField::BroadcastThreshold, self.broadcast_threshold.is_some()),
            (PortField::MulticastThreshold, self.multicast_threshold.is_some()),
            (PortField::Mtu, self.mtu.is_some()),
            (PortField::LoopDetection, self.loop_detection.is_some()),
        ];
        present
            .into_iter()
            .filter_map(|(field, set)| set.then_some(field))
            .collect()
    }

    pub fn contains(&self, field: PortField) -> bool {
        self.fields().contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields().is_empty()
    }

    /// Set `field` to "clear" (absent on the resulting port). Returns
    /// `false` for required fields, which cannot be cleared.
    pub fn clear(&mut self, field: PortField) -> bool {
        match field {
            PortField::Name | PortField::Status | PortField::PoeEnabled => return false,
            PortField::Description => self.description = Some(None),
            PortField::VlanId => self.vlan_id = Some(None),
            PortField::VlanMode => self.vlan_mode = Some(None),
            PortField::AllowedVlans => self.allowed_vlans = Some(None),
            PortField::NativeVlan => self.native_vlan = Some(None),
            PortField::Speed => self.speed = Some(None),
            PortField::InterfaceType => self.interface_type = Some(None),
            PortField::PoePriority => self.poe_priority = Some(None),
            PortField::PoeMaxPower => self.poe_max_power = Some(None),
            PortField::PoeType => self.poe_type = Some(None),
            PortField::FlowControl => self.flow_control = Some(None),
            PortField::StormControl => self.storm_control = Some(None),
            PortField::BroadcastThreshold => self.broadcast_threshold = Some(None),
            PortField::MulticastThreshold => self.multicast_threshold = Some(None),
            PortField::Mtu => self.mtu = Some(None),
            PortField::LoopDetection => self.loop_detection = Some(None),
        }
        true
    }

    // ── Validation ──────────────────────────────────────────────────

    /// Every range violation in the patch, in field declaration order.
    ///
    /// Cleared fields are always valid. Conditional fields are checked on
    /// their own; their guard field does not need to be present.
    pub fn violations(&self) -> Vec<ValidationError> {
        let mut out = Vec::new();

        check_int(&mut out, PortField::VlanId, self.vlan_id, VLAN_MIN..=VLAN_MAX);
        if let Some(Some(expr)) = &self.allowed_vlans {
            if let Err(err) = VlanRanges::parse(expr) {
                out.push(ValidationError {
                    field: PortField::AllowedVlans,
                    value: format!("{expr:?}"),
                    constraint: format!("a VLAN list like \"1,10-20,30\" ({err})"),
                });
            }
        }
        check_int(&mut out, PortField::NativeVlan, self.native_vlan, VLAN_MIN..=VLAN_MAX);
        if let Some(Some(watts)) = self.poe_max_power {
            if !(watts.is_finite() && (0.0..=POE_MAX_POWER_WATTS).contains(&watts)) {
                out.push(ValidationError {
                    field: PortField::PoeMaxPower,
                    value: watts.to_string(),
                    constraint: format!("a number in [0, {POE_MAX_POWER_WATTS}]"),
                });
            }
        }
        check_int(
            &mut out,
            PortField::BroadcastThreshold,
            self.broadcast_threshold,
            0..=THRESHOLD_MAX_PCT,
        );
        check_int(
            &mut out,
            PortField::MulticastThreshold,
            self.multicast_threshold,
            0..=THRESHOLD_MAX_PCT,
        );
        check_int(&mut out, PortField::Mtu, self.mtu, MTU_MIN..=MTU_MAX);

        out
    }

    /// First violation, if any.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.violations().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    // ── Merge ───────────────────────────────────────────────────────

    /// Field-level override: patch fields win, everything else (including
    /// the port id) is copied from `port`.
    #[must_use]
    pub fn apply(&self, port: &Port) -> Port {
        let mut out = port.clone();
        if let Some(v) = &self.name {
            out.name.clone_from(v);
        }
        if let Some(v) = self.status {
            out.status = v;
        }
        if let Some(v) = &self.description {
            out.description.clone_from(v);
        }
        if let Some(v) = self.poe_enabled {
            out.poe_enabled = v;
        }
        if let Some(v) = self.vlan_id {
            out.vlan_id = v;
        }
        if let Some(v) = self.vlan_mode {
            out.vlan_mode = v;
        }
        if let Some(v) = &self.allowed_vlans {
            out.allowed_vlans.clone_from(v);
        }
        if let Some(v) = self.native_vlan {
            out.native_vlan = v;
        }
        if let Some(v) = self.speed {
            out.speed = v;
        }
        if let Some(v) = self.interface_type {
            out.interface_type = v;
        }
        if let Some(v) = self.poe_priority {
            out.poe_priority = v;
        }
        if let Some(v) = self.poe_max_power {
            out.poe_max_power = v;
        }
        if let Some(v) = self.poe_type {
            out.poe_type = v;
        }
        if let Some(v) = self.flow_control {
            out.flow_control = v;
        }
        if let Some(v) = self.storm_control {
            out.storm_control = v;
        }
        if let Some(v) = self.broadcast_threshold {
            out.broadcast_threshold = v;
        }
        if let Some(v) = self.multicast_threshold {
            out.multicast_threshold = v;
        }
        if let Some(v) = self.mtu {
            out.mtu = v;
        }
        if let Some(v) = self.loop_detection {
            out.loop_detection = v;
        }
        out
    }

    /// Like [`apply`](Self::apply), but hands back the same `Arc` when the
    /// merge leaves the port unchanged.
    pub fn apply_shared(&self, port: &Arc<Port>) -> Arc<Port> {
        if self.is_empty() {
            return Arc::clone(port);
        }
        let merged = self.apply(port);
        if merged == **port {
            Arc::clone(port)
        } else {
            Arc::new(merged)
        }
    }
}

fn check_int(
    out: &mut Vec<ValidationError>,
    field: PortField,
    slot: Option<Option<u32>>,
    range: RangeInclusive<u32>,
) {
    if let Some(Some(value)) = slot {
        if !range.contains(&value) {
            out.push(ValidationError {
                field,
                value: value.to_string(),
                constraint: format!("an integer in [{}, {}]", range.start(), range.end()),
            });
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    fn port() -> Port {
        let mut p = Port::new(3, "GigabitEthernet0/0/3", PortStatus::Connected);
        p.description = Some("Port 3".into());
        p.vlan_id = Some(1);
        p.vlan_mode = Some(VlanMode::Access);
        p.speed = Some(PortSpeed::Auto);
        p.poe_priority = Some(PoePriority::Low);
        p.poe_max_power = Some(30.0);
        p.mtu = Some(1500);
        p
    }

    #[test]
    fn empty_patch_is_identity() {
        let p = port();
        assert_eq!(ConfigPatch::new().apply(&p), p);
        assert!(ConfigPatch::new().is_empty());
    }

    #[test]
    fn patch_fields_win_and_others_are_kept() {
        let p = port();
        let patch = ConfigPatch {
            poe_enabled: Some(true),
            poe_priority: Some(Some(PoePriority::High)),
            ..ConfigPatch::default()
        };
        let merged = patch.apply(&p);

        assert!(merged.poe_enabled);
        assert_eq!(merged.poe_priority, Some(PoePriority::High));
        assert_eq!(merged.id, p.id);
        assert_eq!(merged.name, p.name);
        assert_eq!(merged.description, p.description);
        assert_eq!(merged.vlan_id, p.vlan_id);
        assert_eq!(merged.mtu, p.mtu);
        assert_eq!(merged.poe_max_power, p.poe_max_power);
    }

    #[test]
    fn merge_is_idempotent() {
        let p = port();
        let patch = ConfigPatch {
            mtu: Some(Some(9000)),
            vlan_mode: Some(Some(VlanMode::Trunk)),
            allowed_vlans: Some(Some("1,10-20".into())),
            description: Some(None),
            ..ConfigPatch::default()
        };
        let once = patch.apply(&p);
        assert_eq!(patch.apply(&once), once);
    }

    #[test]
    fn clear_removes_optional_field() {
        let mut patch = ConfigPatch::new();
        assert!(patch.clear(PortField::Description));
        assert!(!patch.clear(PortField::Name));

        let merged = patch.apply(&port());
        assert_eq!(merged.description, None);
        assert_eq!(patch.fields(), vec![PortField::Description]);
    }

    #[test]
    fn from_port_round_trips_through_apply() {
        let mut edited = port();
        edited.name = "uplink".into();
        edited.description = None;
        edited.storm_control = Some(true);

        let merged = ConfigPatch::from_port(&edited).apply(&port());
        assert_eq!(merged, edited);
        assert_eq!(ConfigPatch::from_port(&edited).fields().len(), PortField::iter().count());
    }

    #[test]
    fn apply_shared_reuses_unchanged_ports() {
        let p = Arc::new(port());
        let noop = ConfigPatch {
            mtu: Some(Some(1500)),
            ..ConfigPatch::default()
        };
        assert!(Arc::ptr_eq(&noop.apply_shared(&p), &p));
        assert!(Arc::ptr_eq(&ConfigPatch::new().apply_shared(&p), &p));

        let change = ConfigPatch {
            mtu: Some(Some(9000)),
            ..ConfigPatch::default()
        };
        let changed = change.apply_shared(&p);
        assert!(!Arc::ptr_eq(&changed, &p));
        assert_eq!(changed.mtu, Some(9000));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let patch = ConfigPatch {
            vlan_id: Some(Some(5000)),
            ..ConfigPatch::default()
        };
        let err = patch.validate().unwrap_err();
        assert_eq!(err.field, PortField::VlanId);
        assert_eq!(err.value, "5000");
        assert_eq!(err.constraint, "an integer in [1, 4094]");

        let zero = ConfigPatch {
            vlan_id: Some(Some(0)),
            ..ConfigPatch::default()
        };
        assert_eq!(zero.validate().unwrap_err().field, PortField::VlanId);
    }

    #[test]
    fn collects_every_violation() {
        let patch = ConfigPatch {
            native_vlan: Some(Some(4095)),
            poe_max_power: Some(Some(f64::NAN)),
            broadcast_threshold: Some(Some(101)),
            multicast_threshold: Some(Some(100)),
            mtu: Some(Some(63)),
            allowed_vlans: Some(Some("10-5".into())),
            ..ConfigPatch::default()
        };
        let fields: Vec<PortField> = patch.violations().iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![
                PortField::AllowedVlans,
                PortField::NativeVlan,
                PortField::PoeMaxPower,
                PortField::BroadcastThreshold,
                PortField::Mtu,
            ]
        );
    }

    #[test]
    fn boundaries_are_inclusive() {
        let patch = ConfigPatch {
            vlan_id: Some(Some(4094)),
            native_vlan: Some(Some(1)),
            poe_max_power: Some(Some(90.0)),
            broadcast_threshold: Some(Some(0)),
            mtu: Some(Some(9216)),
            ..ConfigPatch::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn conditional_fields_validate_without_their_guard() {
        let patch = ConfigPatch {
            poe_priority: Some(Some(PoePriority::Critical)),
            broadcast_threshold: Some(Some(50)),
            allowed_vlans: Some(Some("100-200".into())),
            ..ConfigPatch::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn cleared_fields_are_valid() {
        let mut patch = ConfigPatch::new();
        patch.clear(PortField::Mtu);
        patch.clear(PortField::VlanId);
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn json_distinguishes_absent_from_null() {
        let patch: ConfigPatch =
            serde_json::from_str(r#"{"poeEnabled":true,"description":null,"vlanId":20}"#).unwrap();
        assert_eq!(patch.poe_enabled, Some(true));
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.vlan_id, Some(Some(20)));
        assert_eq!(patch.mtu, None);

        let back = serde_json::to_value(&patch).unwrap();
        assert_eq!(back["description"], serde_json::Value::Null);
        assert!(back.as_object().unwrap().get("mtu").is_none());
    }

    #[test]
    fn json_rejects_unknown_and_id_fields() {
        assert!(serde_json::from_str::<ConfigPatch>(r#"{"id":4}"#).is_err());
        assert!(serde_json::from_str::<ConfigPatch>(r#"{"vlan":4}"#).is_err());
    }

    #[test]
    fn field_names_match_wire_names() {
        assert_eq!(PortField::BroadcastThreshold.to_string(), "broadcastThreshold");
        assert_eq!("poeMaxPower".parse::<PortField>().unwrap(), PortField::PoeMaxPower);
        assert_eq!(PortField::Mtu.as_ref(), "mtu");
        assert!(!PortField::Status.is_clearable());
        assert!(PortField::AllowedVlans.is_clearable());
    }
}
