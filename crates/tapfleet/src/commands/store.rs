//! Device store handlers.

use tapfleet_core::{Command, CommandResult};

use crate::cli::{StoreArgs, StoreCommand};
use crate::config::Settings;
use crate::error::CliError;
use crate::output;

use super::util;

pub fn handle(args: StoreArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        StoreCommand::Path => {
            output::print_output(&settings.slot().path().display().to_string(), settings.quiet);
            Ok(())
        }

        StoreCommand::Export => {
            let fleet = settings.open_fleet()?;
            output::print_output(&fleet.store().export_json()?, settings.quiet);
            Ok(())
        }

        StoreCommand::Reset => {
            let path = settings.slot().path().display().to_string();
            if !util::confirm(
                &format!("Discard every edit in {path} and restore the seed devices?"),
                "store reset",
                settings.yes,
            )? {
                settings.note("Aborted");
                return Ok(());
            }

            let mut fleet = settings.open_fleet()?;
            if let CommandResult::Reset { devices } = fleet.execute(Command::ResetStore)? {
                settings.note(format!("Store reset to {devices} seed device(s)"));
            }
            Ok(())
        }
    }
}
