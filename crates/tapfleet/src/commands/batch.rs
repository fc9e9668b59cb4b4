//! Batch command handlers.

use serde::Serialize;
use tabled::Tabled;
use tapfleet_core::{BatchOutcome, BatchPlan, Command, CommandResult, PortRef, engine, selection};

use crate::cli::{BatchArgs, BatchCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Dry-run view ────────────────────────────────────────────────────

#[derive(Clone, Serialize, Tabled)]
#[serde(rename_all = "camelCase")]
struct PlannedDevice {
    #[tabled(rename = "Device")]
    device: String,
    #[tabled(rename = "Ports")]
    ports: String,
    #[tabled(rename = "Targeted")]
    targeted: usize,
    #[tabled(rename = "Changing")]
    changing: usize,
}

fn planned(plan: &BatchPlan) -> Vec<PlannedDevice> {
    plan.updates
        .iter()
        .map(|u| PlannedDevice {
            device: u.device.id.to_string(),
            ports: u
                .ports
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
            targeted: u.ports.len(),
            changing: u.changed,
        })
        .collect()
}

fn outcome_detail(o: &BatchOutcome) -> String {
    let mut lines = vec![
        format!("Devices updated: {}", o.devices_updated),
        format!("Ports updated:   {}", o.ports_updated),
    ];
    if !o.skipped.is_empty() {
        lines.push(format!("Skipped:         {}", join_refs(&o.skipped)));
    }
    lines.join("\n")
}

fn join_refs(refs: &[PortRef]) -> String {
    refs.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: BatchArgs, settings: &Settings) -> Result<(), CliError> {
    let mut fleet = settings.open_fleet()?;

    match args.command {
        BatchCommand::Apply {
            select,
            from_file,
            dry_run,
            fields,
        } => {
            let patch = util::build_patch(from_file.as_deref(), &fields)?;
            if patch.is_empty() {
                return Err(CliError::EmptyPatch);
            }
            let targets = util::parse_selection(&fleet, &select)?;

            if dry_run {
                let groups = selection::group_refs(&targets);
                let plan = engine::plan_groups(&fleet.store().snapshot(), &groups, &patch)?;
                if !plan.skipped.is_empty() {
                    settings.note(format!("Would skip: {}", join_refs(&plan.skipped)));
                }
                let rows = planned(&plan);
                let out = output::render_list(
                    settings.format,
                    &rows,
                    PlannedDevice::clone,
                    |r| r.device.clone(),
                );
                output::print_output(&out, settings.quiet);
                settings.note(format!(
                    "Dry run: {} port(s) on {} device(s); nothing written",
                    plan.ports_targeted(),
                    plan.updates.len()
                ));
                return Ok(());
            }

            let result = fleet.execute(Command::ApplyPatch { targets, patch })?;
            let CommandResult::Applied(outcome) = result else {
                return Ok(());
            };
            if outcome.devices_updated == 0 {
                settings.note(format!("Skipped: {}", join_refs(&outcome.skipped)));
                return Err(CliError::EmptySelection);
            }
            let out = output::render_single(
                settings.format,
                &outcome,
                outcome_detail,
                |o| o.ports_updated.to_string(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }
    }
}
