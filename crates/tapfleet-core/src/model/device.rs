// ── Device domain types ──

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantNames};

use super::entity_id::{DeviceId, PortId};
use super::port::Port;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, VariantNames,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PowerStatus {
    On,
    Off,
}

impl PowerStatus {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

/// A port-aggregator device and its ports in physical order.
///
/// Devices are never mutated in place. Every update builds a new value via
/// [`Device::with_ports`]; ports are held behind `Arc` so that untouched
/// ports are shared between the old and the new value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub model: String,
    pub ip: String,
    pub mac: String,
    pub version: String,
    pub power_status: PowerStatus,
    /// Watts. `current_power <= max_power` is expected but not enforced.
    pub max_power: f64,
    pub current_power: f64,
    pub ports: Vec<Arc<Port>>,
}

impl Device {
    pub fn port(&self, id: PortId) -> Option<&Arc<Port>> {
        self.ports.iter().find(|p| p.id == id)
    }

    pub fn has_port(&self, id: PortId) -> bool {
        self.port(id).is_some()
    }

    /// A new device value with `ports` and every other field copied.
    #[must_use]
    pub fn with_ports(&self, ports: Vec<Arc<Port>>) -> Self {
        Self {
            id: self.id.clone(),
            name: self.name.clone(),
            model: self.model.clone(),
            ip: self.ip.clone(),
            mac: self.mac.clone(),
            version: self.version.clone(),
            power_status: self.power_status,
            max_power: self.max_power,
            current_power: self.current_power,
            ports,
        }
    }

    pub fn port_count(&self) -> usize {
        self.ports.len()
    }

    pub fn connected_port_count(&self) -> usize {
        self.ports.iter().filter(|p| p.is_connected()).count()
    }

    pub fn poe_port_count(&self) -> usize {
        self.ports.iter().filter(|p| p.poe_enabled).count()
    }

    pub fn is_online(&self) -> bool {
        self.power_status.is_on()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::PortStatus;

    fn device() -> Device {
        Device {
            id: DeviceId::from("switch-009"),
            name: "Lab TAP".into(),
            model: "TAP-4".into(),
            ip: "10.0.0.9".into(),
            mac: "00-4B-CD-00-00-09".into(),
            version: "TAP-LAB1.0".into(),
            power_status: PowerStatus::On,
            max_power: 200.0,
            current_power: 50.0,
            ports: (1..=4)
                .map(|i| {
                    let status = if i % 2 == 0 {
                        PortStatus::Connected
                    } else {
                        PortStatus::Disconnected
                    };
                    let mut port = Port::new(i, format!("Gi0/0/{i}"), status);
                    port.poe_enabled = i == 4;
                    Arc::new(port)
                })
                .collect(),
        }
    }

    #[test]
    fn port_lookup_by_id() {
        let d = device();
        assert_eq!(d.port(3).unwrap().name, "Gi0/0/3");
        assert!(d.port(5).is_none());
        assert!(!d.has_port(0));
    }

    #[test]
    fn counts() {
        let d = device();
        assert_eq!(d.port_count(), 4);
        assert_eq!(d.connected_port_count(), 2);
        assert_eq!(d.poe_port_count(), 1);
        assert!(d.is_online());
    }

    #[test]
    fn with_ports_keeps_every_other_field() {
        let d = device();
        let trimmed = d.with_ports(d.ports[..2].to_vec());
        assert_eq!(trimmed.id, d.id);
        assert_eq!(trimmed.mac, d.mac);
        assert_eq!(trimmed.max_power, d.max_power);
        assert_eq!(trimmed.port_count(), 2);
        assert!(Arc::ptr_eq(&trimmed.ports[0], &d.ports[0]));
    }

    #[test]
    fn power_status_wire_format() {
        assert_eq!(serde_json::to_string(&PowerStatus::Off).unwrap(), "\"off\"");
        let json = serde_json::to_value(device()).unwrap();
        assert_eq!(json["powerStatus"], "on");
        assert_eq!(json["maxPower"], 200.0);
        assert_eq!(json["ports"].as_array().unwrap().len(), 4);
    }
}
