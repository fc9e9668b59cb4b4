// ── Deterministic seed fleet ──
//
// Written to the storage slot the first time a store is loaded against an
// empty slot, and again on `reset`.

use std::sync::Arc;

use crate::model::{
    Device, DeviceId, InterfaceType, PoePriority, PoeType, Port, PortId, PortSpeed, PortStatus,
    PowerStatus, VlanMode,
};

/// Share of each device's ports (from the top) with PoE enabled, percent.
const POE_SHARE_PCT: u32 = 30;

struct SeedDevice {
    id: &'static str,
    name: &'static str,
    model: &'static str,
    ip: &'static str,
    mac: &'static str,
    version: &'static str,
    power_status: PowerStatus,
    max_power: f64,
    current_power: f64,
    port_count: u32,
    /// Share of ports (from port 1) that are connected, percent.
    connected_pct: u32,
}

const SEED: [SeedDevice; 4] = [
    SeedDevice {
        id: "switch-001",
        name: "Core TAP-1",
        model: "TAP-48 BUILD20240220",
        ip: "172.16.11.3",
        mac: "00-4B-CD-00-00-03",
        version: "TAP-CORE3.6 BUILD20240220",
        power_status: PowerStatus::On,
        max_power: 3000.0,
        current_power: 1500.0,
        port_count: 48,
        connected_pct: 75,
    },
    SeedDevice {
        id: "switch-002",
        name: "Access TAP-2",
        model: "TAP-24 BUILD20240215",
        ip: "172.16.11.4",
        mac: "00-4B-CD-00-00-04",
        version: "TAP-ACCESS2.1 BUILD20240215",
        power_status: PowerStatus::On,
        max_power: 1500.0,
        current_power: 800.0,
        port_count: 24,
        connected_pct: 50,
    },
    SeedDevice {
        id: "switch-003",
        name: "Aggregation TAP-3",
        model: "TAP-32 BUILD20240210",
        ip: "172.16.11.5",
        mac: "00-4B-CD-00-00-05",
        version: "TAP-AGGREGATE1.8 BUILD20240210",
        power_status: PowerStatus::Off,
        max_power: 2500.0,
        current_power: 0.0,
        port_count: 32,
        connected_pct: 0,
    },
    SeedDevice {
        id: "switch-004",
        name: "Edge TAP-4",
        model: "TAP-12 BUILD20240205",
        ip: "172.16.11.6",
        mac: "00-4B-CD-00-00-06",
        version: "TAP-EDGE1.2 BUILD20240205",
        power_status: PowerStatus::On,
        max_power: 800.0,
        current_power: 400.0,
        port_count: 16,
        connected_pct: 40,
    },
];

/// The four seed devices, `switch-001` through `switch-004`.
pub fn default_fleet() -> Vec<Device> {
    SEED.iter().map(build_device).collect()
}

fn build_device(seed: &SeedDevice) -> Device {
    let connected = share(seed.port_count, seed.connected_pct);
    let poe_from = seed.port_count - share(seed.port_count, POE_SHARE_PCT);

    let ports = (1..=seed.port_count)
        .map(|id| Arc::new(default_port(id, id <= connected, id > poe_from)))
        .collect();

    Device {
        id: DeviceId::from(seed.id),
        name: seed.name.into(),
        model: seed.model.into(),
        ip: seed.ip.into(),
        mac: seed.mac.into(),
        version: seed.version.into(),
        power_status: seed.power_status,
        max_power: seed.max_power,
        current_power: seed.current_power,
        ports,
    }
}

fn default_port(id: PortId, connected: bool, poe: bool) -> Port {
    let status = if connected {
        PortStatus::Connected
    } else {
        PortStatus::Disconnected
    };
    Port {
        description: Some(format!("Port {id}")),
        poe_enabled: poe,
        vlan_id: Some(1),
        vlan_mode: Some(VlanMode::Access),
        speed: Some(PortSpeed::Auto),
        interface_type: Some(InterfaceType::Layer2),
        poe_priority: Some(PoePriority::Low),
        poe_max_power: Some(30.0),
        poe_type: Some(PoeType::Auto),
        flow_control: Some(false),
        storm_control: Some(false),
        broadcast_threshold: Some(10),
        multicast_threshold: Some(10),
        mtu: Some(1500),
        loop_detection: Some(false),
        ..Port::new(id, format!("GigabitEthernet0/0/{id}"), status)
    }
}

// `count * pct / 100`, rounded half up.
fn share(count: u32, pct: u32) -> u32 {
    (count * pct + 50) / 100
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn four_devices_with_expected_port_counts() {
        let fleet = default_fleet();
        let counts: Vec<(String, usize)> = fleet
            .iter()
            .map(|d| (d.id.to_string(), d.port_count()))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("switch-001".into(), 48),
                ("switch-002".into(), 24),
                ("switch-003".into(), 32),
                ("switch-004".into(), 16),
            ]
        );
    }

    #[test]
    fn seed_is_deterministic() {
        assert_eq!(default_fleet(), default_fleet());
    }

    #[test]
    fn switch_002_low_ports_are_connected_without_poe() {
        let fleet = default_fleet();
        let d = &fleet[1];
        for id in 1..=5 {
            let port = d.port(id).unwrap();
            assert!(port.is_connected(), "port {id}");
            assert!(!port.poe_enabled, "port {id}");
        }
        assert_eq!(d.connected_port_count(), 12);
        assert_eq!(d.poe_port_count(), 7);
        assert!(d.port(18).unwrap().poe_enabled);
        assert!(!d.port(17).unwrap().poe_enabled);
    }

    #[test]
    fn powered_off_device_has_nothing_connected() {
        let fleet = default_fleet();
        assert_eq!(fleet[2].connected_port_count(), 0);
        assert!(!fleet[2].is_online());
        assert_eq!(fleet[0].connected_port_count(), 36);
        assert_eq!(fleet[3].connected_port_count(), 6);
    }

    #[test]
    fn ports_carry_defaults() {
        let fleet = default_fleet();
        let port = fleet[0].port(7).unwrap();
        assert_eq!(port.name, "GigabitEthernet0/0/7");
        assert_eq!(port.description.as_deref(), Some("Port 7"));
        assert_eq!(port.vlan_id, Some(1));
        assert_eq!(port.mtu, Some(1500));
        assert_eq!(port.broadcast_threshold, Some(10));
        assert_eq!(port.allowed_vlans, None);
    }
}
