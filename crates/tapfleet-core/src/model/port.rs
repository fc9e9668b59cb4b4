// ── Port domain types ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantNames};

use super::entity_id::PortId;

/// Link state as reported (or administratively forced) for a port.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PortStatus {
    Connected,
    Disconnected,
}

impl PortStatus {
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum VlanMode {
    Access,
    Trunk,
    Hybrid,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, VariantNames,
)]
pub enum PortSpeed {
    #[serde(rename = "auto")]
    #[strum(serialize = "auto")]
    Auto,
    #[serde(rename = "10M")]
    #[strum(serialize = "10M")]
    Mbps10,
    #[serde(rename = "100M")]
    #[strum(serialize = "100M")]
    Mbps100,
    #[serde(rename = "1G")]
    #[strum(serialize = "1G")]
    Gbps1,
    #[serde(rename = "10G")]
    #[strum(serialize = "10G")]
    Gbps10,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InterfaceType {
    Layer2,
    Layer3,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PoePriority {
    Low,
    High,
    Critical,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, VariantNames,
)]
pub enum PoeType {
    #[serde(rename = "auto")]
    #[strum(serialize = "auto")]
    Auto,
    #[serde(rename = "ieee802.3af")]
    #[strum(serialize = "ieee802.3af")]
    Ieee8023af,
    #[serde(rename = "ieee802.3at")]
    #[strum(serialize = "ieee802.3at")]
    Ieee8023at,
    #[serde(rename = "ieee802.3bt")]
    #[strum(serialize = "ieee802.3bt")]
    Ieee8023bt,
}

/// One configurable network interface on a device.
///
/// Fields marked optional may be absent in stored records; absent is
/// distinct from any default value and survives a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    pub status: PortStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub poe_enabled: bool,

    // VLAN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_id: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vlan_mode: Option<VlanMode>,
    /// VLAN range expression, only meaningful in trunk mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_vlans: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_vlan: Option<u32>,

    // Link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<PortSpeed>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_type: Option<InterfaceType>,

    // PoE (only meaningful when `poe_enabled`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poe_priority: Option<PoePriority>,
    /// Watts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poe_max_power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poe_type: Option<PoeType>,

    // Advanced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow_control: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storm_control: Option<bool>,
    /// Percent, only meaningful when storm control is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broadcast_threshold: Option<u32>,
    /// Percent, only meaningful when storm control is on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicast_threshold: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_detection: Option<bool>,
}

impl Port {
    /// A bare port: only the required fields are set.
    pub fn new(id: PortId, name: impl Into<String>, status: PortStatus) -> Self {
        Self {
            id,
            name: name.into(),
            status,
            description: None,
            poe_enabled: false,
            vlan_id: None,
            vlan_mode: None,
            allowed_vlans: None,
            native_vlan: None,
            speed: None,
            interface_type: None,
            poe_priority: None,
            poe_max_power: None,
            poe_type: None,
            flow_control: None,
            storm_control: None,
            broadcast_threshold: None,
            multicast_threshold: None,
            mtu: None,
            loop_detection: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status.is_connected()
    }

    pub fn storm_control_enabled(&self) -> bool {
        self.storm_control.unwrap_or(false)
    }
}
