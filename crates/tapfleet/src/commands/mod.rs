//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod batch;
pub mod config_cmd;
pub mod devices;
pub mod ports;
pub mod stats;
pub mod store;
pub mod util;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch a store-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(args, settings),
        Command::Ports(args) => ports::handle(args, settings),
        Command::Batch(args) => batch::handle(args, settings),
        Command::Stats => stats::handle(settings),
        Command::Store(args) => store::handle(args, settings),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
