// ── Fleet statistics ──
//
// Derived, read-only figures for dashboards. Percentages are unrounded in
// [0, 100]; a device with no ports or no power budget reports 0 %.

use serde::Serialize;

use crate::model::{Device, DeviceId};

/// Per-device figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub id: DeviceId,
    pub name: String,
    pub online: bool,
    pub total_ports: usize,
    pub connected_ports: usize,
    pub poe_ports: usize,
    pub port_utilization_pct: f64,
    pub max_power: f64,
    pub current_power: f64,
    pub power_utilization_pct: f64,
    /// Watts left in the budget, never negative.
    pub remaining_power: f64,
}

impl DeviceSummary {
    pub fn of(device: &Device) -> Self {
        let connected = device.connected_port_count();
        Self {
            id: device.id.clone(),
            name: device.name.clone(),
            online: device.is_online(),
            total_ports: device.port_count(),
            connected_ports: connected,
            poe_ports: device.poe_port_count(),
            port_utilization_pct: percent(connected, device.port_count()),
            max_power: device.max_power,
            current_power: device.current_power,
            power_utilization_pct: power_load(device),
            remaining_power: (device.max_power - device.current_power).max(0.0),
        }
    }
}

/// Whole-fleet figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetOverview {
    pub devices: usize,
    pub online: usize,
    pub offline: usize,
    pub total_ports: usize,
    pub connected_ports: usize,
    pub port_utilization_pct: f64,
    /// Mean of the per-device power loads.
    pub mean_power_load_pct: f64,
    pub summaries: Vec<DeviceSummary>,
}

impl FleetOverview {
    pub fn of<'a>(devices: impl IntoIterator<Item = &'a Device>) -> Self {
        let summaries: Vec<DeviceSummary> = devices.into_iter().map(DeviceSummary::of).collect();

        let online = summaries.iter().filter(|s| s.online).count();
        let total_ports = summaries.iter().map(|s| s.total_ports).sum();
        let connected_ports = summaries.iter().map(|s| s.connected_ports).sum();
        let load_sum: f64 = summaries.iter().map(|s| s.power_utilization_pct).sum();

        Self {
            devices: summaries.len(),
            online,
            offline: summaries.len() - online,
            total_ports,
            connected_ports,
            port_utilization_pct: percent(connected_ports, total_ports),
            mean_power_load_pct: mean(load_sum, summaries.len()),
            summaries,
        }
    }
}

fn power_load(device: &Device) -> f64 {
    if device.max_power > 0.0 && device.current_power.is_finite() {
        (device.current_power / device.max_power * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[allow(clippy::as_conversions, clippy::cast_precision_loss)]
fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}
