// ── Core identity types ──
//
// DeviceId and PortRef form the addressing scheme for every operation:
// a device is named by its globally unique string id, a port by the pair
// (device id, 1-based port id).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Port identifier, unique and immutable within its owning device.
pub type PortId = u32;

// ── DeviceId ────────────────────────────────────────────────────────

/// Globally unique, immutable device identifier (e.g. `"switch-002"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeviceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<String> for DeviceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ── PortRef ─────────────────────────────────────────────────────────

/// A `(deviceId, portId)` pair. Membership tests compare by value; there
/// is no back-reference to the live device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortRef {
    pub device_id: DeviceId,
    pub port_id: PortId,
}

impl PortRef {
    pub fn new(device_id: impl Into<DeviceId>, port_id: PortId) -> Self {
        Self {
            device_id: device_id.into(),
            port_id,
        }
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.device_id, self.port_id)
    }
}
