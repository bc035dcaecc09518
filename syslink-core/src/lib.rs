//! Syslink packet layer
//!
//! Sits on top of a [`Link`](syslink_transport::Link) and turns it into a
//! packet channel:
//!
//! - [`Syslink`] frames packets and sends them, one caller at a time
//! - [`Receiver`] polls the link, runs the frame parser and hands every
//!   accepted packet to a [`PacketHandler`]
//! - [`DispatchTable`] routes packets to the radio, power-management and
//!   one-wire handlers by group

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go FIRST so that all the other modules see its macros.
#[macro_use]
mod fmt;

pub mod dispatch;
pub mod receiver;
pub mod syslink;

#[cfg(test)]
mod mock;

pub use dispatch::{DispatchTable, PacketHandler};
pub use receiver::{Receiver, ReceiverConfig, ReceiverStats};
pub use syslink::Syslink;
pub use syslink_protocol::{Packet, PacketGroup, MTU};
