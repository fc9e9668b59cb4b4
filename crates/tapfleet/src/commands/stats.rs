//! Fleet statistics handler.

use tabled::Tabled;
use tabled::settings::Style;
use tapfleet_core::{DeviceSummary, FleetOverview};

use crate::config::Settings;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Device")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Ports")]
    ports: String,
    #[tabled(rename = "Port Use")]
    port_use: String,
    #[tabled(rename = "PoE")]
    poe: usize,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Load")]
    load: String,
}

fn row(s: &DeviceSummary, color: bool) -> SummaryRow {
    SummaryRow {
        id: s.id.to_string(),
        name: s.name.clone(),
        status: output::paint_state(if s.online { "online" } else { "offline" }, s.online, color),
        ports: format!("{}/{}", s.connected_ports, s.total_ports),
        port_use: output::paint_pct(s.port_utilization_pct, color),
        poe: s.poe_ports,
        power: format!("{:.1}/{:.1} W", s.current_power, s.max_power),
        load: output::paint_pct(s.power_utilization_pct, color),
    }
}

fn detail(o: &FleetOverview, color: bool) -> String {
    let header = [
        format!("Devices:    {} ({} online, {} offline)", o.devices, o.online, o.offline),
        format!(
            "Ports:      {}/{} connected ({})",
            o.connected_ports,
            o.total_ports,
            output::paint_pct(o.port_utilization_pct, color)
        ),
        format!("Power load: {} mean", output::paint_pct(o.mean_power_load_pct, color)),
    ]
    .join("\n");

    if o.summaries.is_empty() {
        return header;
    }
    let rows: Vec<SummaryRow> = o.summaries.iter().map(|s| row(s, color)).collect();
    let table = tabled::Table::new(rows).with(Style::rounded()).to_string();
    format!("{header}\n\n{table}")
}

pub fn handle(settings: &Settings) -> Result<(), CliError> {
    let fleet = settings.open_fleet()?;
    let overview = fleet.overview();
    let color = settings.color;

    let out = output::render_single(
        settings.format,
        &overview,
        |o| detail(o, color),
        |o| o.devices.to_string(),
    );
    output::print_output(&out, settings.quiet);
    Ok(())
}
