//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels.

pub mod one_wire;
pub mod power;
pub mod radio;
pub mod syslink_rx;

pub use one_wire::one_wire_task;
pub use power::power_task;
pub use radio::radio_task;
pub use syslink_rx::syslink_rx_task;
