// ── Command API ──
//
// Serializable write operations a front end can hand to `Fleet::execute`
// without holding a selection of its own.

use serde::{Deserialize, Serialize};

use crate::engine::BatchOutcome;
use crate::model::{DeviceId, Port, PortRef};
use crate::patch::ConfigPatch;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Merge `patch` into every target port.
    ApplyPatch {
        targets: Vec<PortRef>,
        patch: ConfigPatch,
    },
    /// Replace one port with a fully edited copy. `port.id` names the port.
    UpdatePort { device_id: DeviceId, port: Port },
    /// Discard the stored collection and reseed it.
    ResetStore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CommandResult {
    Applied(BatchOutcome),
    Reset { devices: usize },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn apply_patch_from_json() {
        let cmd: Command = serde_json::from_str(
            r#"{"type":"apply_patch","targets":[{"deviceId":"switch-001","portId":10}],"patch":{"mtu":9000}}"#,
        )
        .unwrap();
        let Command::ApplyPatch { targets, patch } = cmd else {
            panic!("wrong variant");
        };
        assert_eq!(targets, vec![PortRef::new("switch-001", 10)]);
        assert_eq!(patch.mtu, Some(Some(9000)));
    }

    #[test]
    fn reset_round_trips() {
        let json = serde_json::to_string(&Command::ResetStore).unwrap();
        assert_eq!(json, r#"{"type":"reset_store"}"#);
        assert!(matches!(
            serde_json::from_str::<Command>(&json).unwrap(),
            Command::ResetStore
        ));
    }
}
