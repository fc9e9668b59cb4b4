// ── Domain model ──

pub mod device;
pub mod entity_id;
pub mod port;

pub use device::{Device, PowerStatus};
pub use entity_id::{DeviceId, PortId, PortRef};
pub use port::{InterfaceType, PoePriority, PoeType, Port, PortSpeed, PortStatus, VlanMode};
