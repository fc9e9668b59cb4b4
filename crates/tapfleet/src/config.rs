//! CLI configuration: thin wrapper around `tapfleet_config`.
//!
//! Re-exports the shared types and layers `GlobalOpts` flag overrides
//! (--config, --store, --key, --output, --color) on top of the file.

use std::path::PathBuf;

use clap::ValueEnum;
use tracing::debug;

use tapfleet_core::{FileSlot, Fleet};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use tapfleet_config::{Config, data_dir, load_config_from, save_config_to};

// ── CLI-specific resolution ─────────────────────────────────────────

/// Config file in effect: `--config` / `TAPFLEET_CONFIG`, else the
/// platform path.
pub fn config_file(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(tapfleet_config::config_path)
}

/// Everything a command handler needs besides its own arguments.
#[derive(Debug)]
pub struct Settings {
    pub config: Config,
    pub format: OutputFormat,
    pub color: bool,
    pub quiet: bool,
    pub yes: bool,
}

impl Settings {
    /// Load the config file and apply flag overrides. Flags win over the
    /// file; the file wins over built-in defaults.
    pub fn resolve(global: &GlobalOpts) -> Result<Self, CliError> {
        let mut config = load_config_from(&config_file(global))?;
        if let Some(dir) = &global.store {
            config.store.path = Some(dir.clone());
        }
        if let Some(key) = &global.key {
            config.store.key.clone_from(key);
        }
        config.validate()?;

        let format = global
            .output
            .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table);
        let color_mode = global
            .color
            .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);

        Ok(Self {
            config,
            format,
            color: output::should_color(color_mode),
            quiet: global.quiet,
            yes: global.yes,
        })
    }

    pub fn slot(&self) -> FileSlot {
        self.config.file_slot()
    }

    /// Load the device store, seeding it on first use.
    pub fn open_fleet(&self) -> Result<Fleet<FileSlot>, CliError> {
        let slot = self.slot();
        debug!(path = %slot.path().display(), "opening device store");
        Ok(Fleet::open(slot)?)
    }

    /// Status line on stderr unless `--quiet`.
    pub fn note(&self, message: impl std::fmt::Display) {
        if !self.quiet {
            eprintln!("{message}");
        }
    }
}
