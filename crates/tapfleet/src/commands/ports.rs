//! Port command handlers.

use std::sync::Arc;

use strum::IntoEnumIterator;
use tabled::Tabled;
use tapfleet_core::{ConfigPatch, Port, PortField, visibility};

use crate::cli::{PortsArgs, PortsCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PortRow {
    #[tabled(rename = "Port")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "PoE")]
    poe: String,
    #[tabled(rename = "MTU")]
    mtu: String,
}

fn dash<T: ToString>(v: Option<T>) -> String {
    v.map_or_else(|| "-".into(), |v| v.to_string())
}

fn row(p: &Arc<Port>, color: bool) -> PortRow {
    let poe = if p.poe_enabled {
        p.poe_priority.map_or_else(|| "on".into(), |prio| format!("on ({prio})"))
    } else {
        "off".into()
    };
    PortRow {
        id: p.id,
        name: p.name.clone(),
        status: output::paint_state(p.status.as_ref(), p.is_connected(), color),
        vlan: dash(p.vlan_id),
        mode: dash(p.vlan_mode),
        speed: dash(p.speed),
        poe,
        mtu: dash(p.mtu),
    }
}

/// Display value of one field, `None` when the port does not carry it.
fn field_value(p: &Port, field: PortField) -> Option<String> {
    match field {
        PortField::Name => Some(p.name.clone()),
        PortField::Status => Some(p.status.to_string()),
        PortField::Description => p.description.clone(),
        PortField::PoeEnabled => Some(p.poe_enabled.to_string()),
        PortField::VlanId => p.vlan_id.map(|v| v.to_string()),
        PortField::VlanMode => p.vlan_mode.map(|v| v.to_string()),
        PortField::AllowedVlans => p.allowed_vlans.clone(),
        PortField::NativeVlan => p.native_vlan.map(|v| v.to_string()),
        PortField::Speed => p.speed.map(|v| v.to_string()),
        PortField::InterfaceType => p.interface_type.map(|v| v.to_string()),
        PortField::PoePriority => p.poe_priority.map(|v| v.to_string()),
        PortField::PoeMaxPower => p.poe_max_power.map(|w| format!("{w} W")),
        PortField::PoeType => p.poe_type.map(|v| v.to_string()),
        PortField::FlowControl => p.flow_control.map(|v| v.to_string()),
        PortField::StormControl => p.storm_control.map(|v| v.to_string()),
        PortField::BroadcastThreshold => p.broadcast_threshold.map(|v| format!("{v}%")),
        PortField::MulticastThreshold => p.multicast_threshold.map(|v| format!("{v}%")),
        PortField::Mtu => p.mtu.map(|v| v.to_string()),
        PortField::LoopDetection => p.loop_detection.map(|v| v.to_string()),
    }
}

/// Field-per-line view. Conditional fields whose guard is off are left
/// out unless `all` is set.
fn detail(p: &Port, all: bool) -> String {
    let mut lines = vec![format!("{:<20} {}", "id", p.id)];
    for field in PortField::iter() {
        if !all && !visibility::is_relevant(p, field) {
            continue;
        }
        lines.push(format!("{:<20} {}", field.as_ref(), dash(field_value(p, field))));
    }
    lines.join("\n")
}

/// Fields the patch set that have no effect on `port` as saved.
fn inactive_fields(port: &Port, patch: &ConfigPatch) -> Vec<String> {
    patch
        .fields()
        .into_iter()
        .filter(|&f| !visibility::is_relevant(port, f))
        .filter_map(|f| f.guard().map(|g| format!("{f} (needs {})", g.field())))
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: PortsArgs, settings: &Settings) -> Result<(), CliError> {
    let mut fleet = settings.open_fleet()?;
    let color = settings.color;

    match args.command {
        PortsCommand::List {
            device,
            connected,
            poe,
        } => {
            let device = fleet.store().find(&device)?;
            let ports: Vec<Arc<Port>> = device
                .ports
                .iter()
                .filter(|p| !connected || p.is_connected())
                .filter(|p| !poe || p.poe_enabled)
                .cloned()
                .collect();
            let out = output::render_list(
                settings.format,
                &ports,
                |p| row(p, color),
                |p| p.id.to_string(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        PortsCommand::Get { device, port, all } => {
            let device = fleet.store().find(&device)?;
            let port = device.port(port).cloned().ok_or_else(|| CliError::NotFound {
                resource_type: "port".into(),
                identifier: format!("{}:{port}", device.id),
                list_command: format!("ports list {}", device.id),
            })?;
            let out = output::render_single(
                settings.format,
                &port,
                |p| detail(p, all),
                |p| p.id.to_string(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        PortsCommand::Set {
            device,
            port,
            from_file,
            fields,
        } => {
            let patch = util::build_patch(from_file.as_deref(), &fields)?;
            if patch.is_empty() {
                return Err(CliError::EmptyPatch);
            }
            let device_id = fleet.store().find(&device)?.id.clone();

            let mut editor = fleet.open_editor(&device_id, port)?;
            editor.apply(&patch);
            if !editor.is_dirty() {
                settings.note(format!("Port {device_id}:{port} already matches; nothing written"));
                return Ok(());
            }
            let saved = editor.working().clone();
            fleet.save_editor(editor)?;

            settings.note(format!("Updated port {device_id}:{port}"));
            let inactive = inactive_fields(&saved, &patch);
            if !inactive.is_empty() {
                settings.note(format!("Saved but inactive: {}", inactive.join(", ")));
            }
            let out = output::render_single(
                settings.format,
                &saved,
                |p| detail(p, false),
                |p| p.id.to_string(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }
    }
}
