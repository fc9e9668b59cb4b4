//! Port selection and batch-configuration engine for fleets of TAP switches.
//!
//! This crate owns the domain model and every state transition behind the
//! `tapfleet` front ends:
//!
//! - **[`DeviceStore`]**: The single source of truth for the device
//!   collection. Loads from a [`StorageSlot`] (seeding an empty one with
//!   [`default_fleet`]), replaces whole devices, and persists the full
//!   collection on every write. Subscribers get a [`DeviceStream`].
//!
//! - **[`SelectionSet`]**: The `(device, port)` pairs chosen for editing,
//!   in single or multi mode.
//!
//! - **[`ConfigPatch`]**: A partial port configuration with per-field
//!   absent / clear / set semantics and range validation.
//!
//! - **[`engine`]**: Validates a patch once, merges it into every selected
//!   port grouped by device, and commits all rebuilt devices in one store
//!   write. Untouched ports are shared (`Arc`) with the previous device.
//!
//! - **[`PortEditor`]**: Single-port editing as a one-entry batch.
//!
//! - **[`Fleet`]**: Facade owning a store and a selection, plus the
//!   serializable [`Command`] API.
//!
//! Field relevance for forms lives in [`visibility`]; dashboard figures in
//! [`stats`].

pub mod command;
pub mod editor;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod model;
pub mod patch;
pub mod selection;
pub mod stats;
pub mod store;
pub mod stream;
pub mod visibility;
pub mod vlan;

// ── Primary re-exports ──────────────────────────────────────────────
pub use command::{Command, CommandResult};
pub use editor::PortEditor;
pub use engine::{BatchOutcome, BatchPlan};
pub use error::{CoreError, ValidationError};
pub use fleet::Fleet;
pub use patch::{ConfigPatch, PortField};
pub use selection::{SelectionChange, SelectionMode, SelectionSet};
pub use stats::{DeviceSummary, FleetOverview};
pub use store::{
    DEFAULT_SLOT_KEY, DeviceStore, FileSlot, MemorySlot, StorageSlot, default_fleet,
};
pub use stream::{DeviceSnapshot, DeviceStream};
pub use visibility::FieldGuard;
pub use vlan::VlanRanges;

pub use model::{
    Device, DeviceId, InterfaceType, PoePriority, PoeType, Port, PortId, PortRef, PortSpeed,
    PortStatus, PowerStatus, VlanMode,
};
