//! Device command handlers.

use std::sync::Arc;

use tabled::Tabled;
use tapfleet_core::{Device, DeviceSummary};

use crate::cli::{DevicesArgs, DevicesCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "IP")]
    ip: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Ports")]
    ports: String,
    #[tabled(rename = "PoE")]
    poe: usize,
}

fn row(d: &Arc<Device>, color: bool) -> DeviceRow {
    DeviceRow {
        id: d.id.to_string(),
        name: d.name.clone(),
        model: d.model.clone(),
        ip: d.ip.clone(),
        power: output::paint_state(d.power_status.as_ref(), d.is_online(), color),
        ports: format!("{}/{}", d.connected_port_count(), d.port_count()),
        poe: d.poe_port_count(),
    }
}

fn detail(d: &Arc<Device>) -> String {
    [
        format!("ID:        {}", d.id),
        format!("Name:      {}", d.name),
        format!("Model:     {}", d.model),
        format!("IP:        {}", d.ip),
        format!("MAC:       {}", d.mac),
        format!("Firmware:  {}", d.version),
        format!("Power:     {}", d.power_status),
        format!("Budget:    {:.1} W / {:.1} W", d.current_power, d.max_power),
        format!(
            "Ports:     {} ({} connected, {} PoE)",
            d.port_count(),
            d.connected_port_count(),
            d.poe_port_count()
        ),
    ]
    .join("\n")
}

fn summary_detail(s: &DeviceSummary, color: bool) -> String {
    [
        format!("ID:          {}", s.id),
        format!("Name:        {}", s.name),
        format!(
            "Status:      {}",
            output::paint_state(if s.online { "online" } else { "offline" }, s.online, color)
        ),
        format!(
            "Ports:       {}/{} connected ({})",
            s.connected_ports,
            s.total_ports,
            output::paint_pct(s.port_utilization_pct, color)
        ),
        format!("PoE ports:   {}", s.poe_ports),
        format!(
            "Power:       {:.1} W of {:.1} W ({})",
            s.current_power,
            s.max_power,
            output::paint_pct(s.power_utilization_pct, color)
        ),
        format!("Remaining:   {:.1} W", s.remaining_power),
    ]
    .join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: DevicesArgs, settings: &Settings) -> Result<(), CliError> {
    let fleet = settings.open_fleet()?;
    let color = settings.color;

    match args.command {
        DevicesCommand::List => {
            let snap = fleet.store().snapshot();
            let out = output::render_list(
                settings.format,
                snap.as_slice(),
                |d| row(d, color),
                |d| d.id.to_string(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let device = fleet.store().find(&device)?;
            let out = output::render_single(settings.format, &device, detail, |d| d.id.to_string());
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        DevicesCommand::Summary { device } => {
            let device = fleet.store().find(&device)?;
            let summary = DeviceSummary::of(&device);
            let out = output::render_single(
                settings.format,
                &summary,
                |s| summary_detail(s, color),
                |s| s.id.to_string(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }
    }
}
