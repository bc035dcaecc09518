//! Syslink Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the syslink transport is written
//! against. Chip-specific crates implement them on top of their register
//! blocks; host tests implement them with recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  syslink-transport (UART/DMA driver)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  syslink-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ syslink-hal-  │       │  host mocks   │
//! │    stm32f4    │       │  (unit tests) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::SerialPort`] - UART data/status registers and interrupt enables
//! - [`dma::DmaStream`] - One DMA stream bound to its memory window
//! - [`gpio::InputPin`], [`gpio::EdgeInterruptPin`] - Flow-control line

#![no_std]
#![deny(unsafe_code)]

pub mod dma;
pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use dma::DmaStream;
pub use gpio::{Edge, EdgeInterruptPin, InputPin};
pub use uart::{
    DataBits, DmaDirection, Parity, SerialPort, StopBits, UartConfig, UartInterrupt, UartMode,
    UartStatus,
};
