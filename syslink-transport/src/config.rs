//! Transport configuration
//!
//! Build-time settings of the link. The baud rate is shared with the
//! co-processor firmware and must match it.

use embassy_time::Duration;
use syslink_hal::UartConfig;

/// Default wait of [`Transport::receive_byte`](crate::Transport::receive_byte)
pub const DEFAULT_RECEIVE_TIMEOUT_MS: u32 = 1000;

/// Transport configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct LinkConfig {
    /// Serial port settings
    pub uart: UartConfig,
    /// How long a byte-queue read waits before reporting no data
    pub receive_timeout_ms: u32,
    /// Deliver every received byte to the byte queue from the RX interrupt
    pub byte_interrupts: bool,
    /// Make the low-rate polled send wait while the peer holds flow control
    pub spin_on_flow_control: bool,
}

impl LinkConfig {
    /// Transmit-only configuration for raw trace output
    pub const fn trace_output() -> Self {
        Self {
            uart: UartConfig::trace_output(),
            receive_timeout_ms: DEFAULT_RECEIVE_TIMEOUT_MS,
            byte_interrupts: false,
            spin_on_flow_control: false,
        }
    }

    /// Byte-queue read timeout
    pub fn receive_timeout(&self) -> Duration {
        Duration::from_millis(self.receive_timeout_ms as u64)
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            uart: UartConfig::default(),
            receive_timeout_ms: DEFAULT_RECEIVE_TIMEOUT_MS,
            byte_interrupts: true,
            spin_on_flow_control: false,
        }
    }
}
