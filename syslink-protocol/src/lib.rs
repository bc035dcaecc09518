//! Syslink Packet Protocol
//!
//! This crate defines the framed packet protocol spoken over the UART between
//! the application MCU and the radio/power co-processor. The protocol is
//! designed for a noisy link: malformed frames are dropped and the parser
//! resynchronizes on the next start sequence.
//!
//! # Frame Format
//!
//! ```text
//! ┌──────┬──────┬──────┬────────┬─────────────┬────────┬────────┐
//! │ 0xBC │ 0xCF │ TYPE │ LENGTH │ DATA        │ CKSUM0 │ CKSUM1 │
//! │ 1B   │ 1B   │ 1B   │ 1B     │ 0–64B       │ 1B     │ 1B     │
//! └──────┴──────┴──────┴────────┴─────────────┴────────┴────────┘
//! ```
//!
//! The high nibble of TYPE selects the subsystem the packet belongs to
//! (radio, power management, one-wire memory).

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod checksum;
pub mod frame;
pub mod group;
pub mod packet;

pub use checksum::Checksum;
pub use frame::{
    is_plausible_frame, FrameError, FrameParser, ParseState, MAX_FRAME_SIZE, START_BYTE1,
    START_BYTE2,
};
pub use group::{PacketGroup, GROUP_MASK};
pub use packet::{Packet, MTU};
