//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use tapfleet_config::ConfigError;
use tapfleet_core::CoreError;

/// Process exit codes.
#[allow(dead_code)]
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(tapfleet::not_found),
        help("Run: tapfleet {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(tapfleet::validation))]
    Validation { field: String, reason: String },

    #[error("No ports selected")]
    #[diagnostic(
        code(tapfleet::empty_selection),
        help("Pass at least one --select DEVICE:PORTS naming existing ports.")
    )]
    EmptySelection,

    #[error("Nothing to change")]
    #[diagnostic(
        code(tapfleet::empty_patch),
        help("Pass at least one field flag (see --help), --clear FIELD, or --from-file.")
    )]
    EmptyPatch,

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(tapfleet::config))]
    Config(Box<figment::Error>),

    // ── Storage ──────────────────────────────────────────────────────
    #[error("Device store error: {message}")]
    #[diagnostic(
        code(tapfleet::store),
        help("Inspect the store file, or discard it with: tapfleet store reset")
    )]
    Store { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(tapfleet::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(tapfleet::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::EmptySelection
            | Self::EmptyPatch
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => CliError::Validation {
                field: v.field.to_string(),
                reason: format!("{} is out of range: expected {}", v.value, v.constraint),
            },

            CoreError::EmptySelection => CliError::EmptySelection,

            CoreError::DeviceNotFound { identifier } => CliError::NotFound {
                resource_type: "device".into(),
                identifier,
                list_command: "devices list".into(),
            },

            CoreError::PortNotFound { device, port } => CliError::NotFound {
                resource_type: "port".into(),
                identifier: format!("{device}:{port}"),
                list_command: format!("ports list {device}"),
            },

            CoreError::Storage { message } => CliError::Store { message },
            CoreError::Io(e) => CliError::Store {
                message: e.to_string(),
            },
            CoreError::Serialization(e) => CliError::Store {
                message: format!("stored data is not valid JSON: {e}"),
            },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: format!("failed to serialize config: {e}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tapfleet_core::{PortField, ValidationError};

    #[test]
    fn core_errors_map_to_exit_codes() {
        let not_found: CliError = CoreError::PortNotFound {
            device: "switch-004".into(),
            port: 17,
        }
        .into();
        assert_eq!(not_found.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(not_found.to_string(), "port 'switch-004:17' not found");

        let invalid: CliError = CoreError::Validation(ValidationError {
            field: PortField::VlanId,
            value: "5000".into(),
            constraint: "an integer in [1, 4094]".into(),
        })
        .into();
        assert_eq!(invalid.exit_code(), exit_code::USAGE);
        assert!(invalid.to_string().contains("vlanId"));

        let empty: CliError = CoreError::EmptySelection.into();
        assert_eq!(empty.exit_code(), exit_code::USAGE);

        let storage: CliError = CoreError::Storage {
            message: "disk full".into(),
        }
        .into();
        assert_eq!(storage.exit_code(), exit_code::GENERAL);
    }
}
