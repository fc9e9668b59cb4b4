//! Config subcommand handlers.

use std::path::PathBuf;

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

use super::util;

const OUTPUT_CHOICES: [&str; 4] = ["table", "json", "yaml", "plain"];

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn prompt_config(global: &GlobalOpts) -> Result<Config, CliError> {
    let default_dir = global.store.clone().unwrap_or_else(config::data_dir);

    let dir: String = Input::new()
        .with_prompt("Device store directory")
        .default(default_dir.display().to_string())
        .interact_text()
        .map_err(prompt_err)?;

    let output = Select::new()
        .with_prompt("Default output format")
        .items(&OUTPUT_CHOICES)
        .default(0)
        .interact()
        .map_err(prompt_err)?;

    let mut cfg = Config::default();
    cfg.store.path = Some(PathBuf::from(dir));
    cfg.defaults.output = OUTPUT_CHOICES
        .get(output)
        .copied()
        .unwrap_or("table")
        .into();
    Ok(cfg)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_file(global);

    match args.command {
        // ── Init: wizard, or defaults with --yes ─────────────────────
        ConfigCommand::Init => {
            if path.exists()
                && !util::confirm(
                    &format!("{} exists. Overwrite?", path.display()),
                    "config init",
                    global.yes,
                )?
            {
                eprintln!("Aborted");
                return Ok(());
            }

            let cfg = if global.yes {
                let mut cfg = Config::default();
                cfg.store.path = global.store.clone();
                if let Some(key) = &global.key {
                    cfg.store.key.clone_from(key);
                }
                cfg
            } else {
                prompt_config(global)?
            };

            config::save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("Configuration written to {}", path.display());
                eprintln!("Device store: {}", cfg.file_slot().path().display());
            }
            Ok(())
        }

        // ── Show ─────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let settings = config::Settings::resolve(global)?;
            let out = output::render_single(
                settings.format,
                &settings.config,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("{c:#?}\n# {e}")),
                |c| c.file_slot().path().display().to_string(),
            );
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        // ── Path ─────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), global.quiet);
            Ok(())
        }
    }
}
