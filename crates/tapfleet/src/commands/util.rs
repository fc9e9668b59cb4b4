//! Shared helpers for command handlers.

use std::path::Path;
use std::str::FromStr;

use tapfleet_core::{ConfigPatch, FileSlot, Fleet, PortField, PortId, PortRef};

use crate::cli::PortFieldArgs;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal to prompt on, fails with a hint to pass `--yes`.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|_| CliError::NonInteractiveRequiresYes {
            action: action.into(),
        })
}

/// Read a JSON patch for `--from-file` flags.
pub fn read_patch_file(path: &Path) -> Result<ConfigPatch, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

/// Combine `--from-file` and the field flags into one patch. Flags win
/// over the file; `--clear` runs last.
pub fn build_patch(from_file: Option<&Path>, args: &PortFieldArgs) -> Result<ConfigPatch, CliError> {
    let mut patch = match from_file {
        Some(path) => read_patch_file(path)?,
        None => ConfigPatch::new(),
    };

    if let Some(v) = &args.name {
        patch.name = Some(v.clone());
    }
    if let Some(v) = &args.status {
        patch.status = Some(parse_value(PortField::Status, v)?);
    }
    if let Some(v) = &args.description {
        patch.description = Some(Some(v.clone()));
    }
    if let Some(v) = args.poe_enabled {
        patch.poe_enabled = Some(v);
    }
    if let Some(v) = args.vlan_id {
        patch.vlan_id = Some(Some(v));
    }
    if let Some(v) = &args.vlan_mode {
        patch.vlan_mode = Some(Some(parse_value(PortField::VlanMode, v)?));
    }
    if let Some(v) = &args.allowed_vlans {
        patch.allowed_vlans = Some(Some(v.clone()));
    }
    if let Some(v) = args.native_vlan {
        patch.native_vlan = Some(Some(v));
    }
    if let Some(v) = &args.speed {
        patch.speed = Some(Some(parse_value(PortField::Speed, v)?));
    }
    if let Some(v) = &args.interface_type {
        patch.interface_type = Some(Some(parse_value(PortField::InterfaceType, v)?));
    }
    if let Some(v) = &args.poe_priority {
        patch.poe_priority = Some(Some(parse_value(PortField::PoePriority, v)?));
    }
    if let Some(v) = args.poe_max_power {
        patch.poe_max_power = Some(Some(v));
    }
    if let Some(v) = &args.poe_type {
        patch.poe_type = Some(Some(parse_value(PortField::PoeType, v)?));
    }
    if let Some(v) = args.flow_control {
        patch.flow_control = Some(Some(v));
    }
    if let Some(v) = args.storm_control {
        patch.storm_control = Some(Some(v));
    }
    if let Some(v) = args.broadcast_threshold {
        patch.broadcast_threshold = Some(Some(v));
    }
    if let Some(v) = args.multicast_threshold {
        patch.multicast_threshold = Some(Some(v));
    }
    if let Some(v) = args.mtu {
        patch.mtu = Some(Some(v));
    }
    if let Some(v) = args.loop_detection {
        patch.loop_detection = Some(Some(v));
    }

    for raw in &args.clear {
        let field = parse_field(raw)?;
        if !patch.clear(field) {
            return Err(CliError::Validation {
                field: field.to_string(),
                reason: "required field, it can be changed but not cleared".into(),
            });
        }
    }

    Ok(patch)
}

fn parse_value<T: FromStr>(field: PortField, raw: &str) -> Result<T, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: field.to_string(),
        reason: format!("unknown value '{raw}'"),
    })
}

/// Accepts wire names (`poeMaxPower`) and flag spellings (`poe-max-power`).
pub fn parse_field(raw: &str) -> Result<PortField, CliError> {
    let mut camel = String::with_capacity(raw.len());
    let mut upper = false;
    for c in raw.trim().chars() {
        if c == '-' || c == '_' {
            upper = true;
        } else if upper {
            camel.extend(c.to_uppercase());
            upper = false;
        } else {
            camel.push(c);
        }
    }
    camel.parse().map_err(|_| CliError::Validation {
        field: "clear".into(),
        reason: format!("unknown port field '{raw}'"),
    })
}

/// Parse a port list such as `1,3,5-8`.
pub fn parse_port_list(raw: &str) -> Result<Vec<PortId>, CliError> {
    let invalid = |reason: String| CliError::Validation {
        field: "select".into(),
        reason,
    };
    let mut out = Vec::new();
    for part in raw.split(',').map(str::trim) {
        if part.is_empty() {
            return Err(invalid(format!("empty entry in port list '{raw}'")));
        }
        let (start, end) = match part.split_once('-') {
            Some((a, b)) => (a.trim(), b.trim()),
            None => (part, part),
        };
        let start: PortId = start
            .parse()
            .map_err(|_| invalid(format!("'{part}' is not a port number or range")))?;
        let end: PortId = end
            .parse()
            .map_err(|_| invalid(format!("'{part}' is not a port number or range")))?;
        if start > end {
            return Err(invalid(format!("range '{part}' is descending")));
        }
        out.extend(start..=end);
    }
    Ok(out)
}

/// Resolve `DEVICE:PORTS` selectors against the store. Devices may be
/// named by id or name; ports that do not exist are kept so the batch can
/// report them as skipped.
pub fn parse_selection(fleet: &Fleet<FileSlot>, specs: &[String]) -> Result<Vec<PortRef>, CliError> {
    let mut targets = Vec::new();
    for spec in specs {
        let (device, ports) = spec.rsplit_once(':').ok_or_else(|| CliError::Validation {
            field: "select".into(),
            reason: format!("'{spec}' is not DEVICE:PORTS"),
        })?;
        let device = fleet.store().find(device)?;
        for port in parse_port_list(ports)? {
            let target = PortRef::new(device.id.clone(), port);
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
    }
    Ok(targets)
}
