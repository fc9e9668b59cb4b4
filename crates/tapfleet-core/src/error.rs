// ── Core error types ──
//
// User-facing errors from tapfleet-core. Storage failures are flattened
// into `Storage` / `Io` / `Serialization`; consumers never see the slot
// implementation behind them.

use thiserror::Error;

use crate::model::{DeviceId, PortId};
use crate::patch::PortField;

/// A patch field whose value violates its declared constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} = {value} is out of range: expected {constraint}")]
pub struct ValidationError {
    pub field: PortField,
    /// The rejected value, rendered for display.
    pub value: String,
    /// Human-readable constraint, e.g. `"an integer in [1, 4094]"`.
    pub constraint: String,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("No ports selected")]
    EmptySelection,

    // ── Data errors ──────────────────────────────────────────────────
    #[error("Device not found: {identifier}")]
    DeviceNotFound { identifier: String },

    #[error("Port {port} not found on device {device}")]
    PortNotFound { device: DeviceId, port: PortId },

    // ── Storage errors ───────────────────────────────────────────────
    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored device collection is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// The validation failure carried by this error, if any.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}
