//! UART transport for the syslink
//!
//! This crate owns the serial link to the co-processor:
//!
//! - DMA transmit with flow-control pause/resume driven by the peer
//! - DMA receive into a fixed buffer, handed to one consumer per cycle
//! - Byte-at-a-time interrupt receive into a bounded queue
//! - Low-rate polled and interrupt-driven transmit
//!
//! Interrupt handlers only copy bytes and release signals; tasks block on
//! those signals. All register access goes through the `syslink-hal` traits.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This must go FIRST so that all the other modules see its macros.
#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod link;
pub mod spin;
pub mod stats;
pub mod transport;

#[cfg(test)]
mod mock;

pub use config::LinkConfig;
pub use error::TransportError;
pub use link::Link;
pub use stats::LinkStats;
pub use transport::{DmaPauseState, Peripherals, Transport};
