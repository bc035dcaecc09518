//! UART serial port abstractions
//!
//! The syslink transport drives the UART at register level: it polls status
//! flags, moves single bytes through the data register and switches interrupt
//! sources and DMA requests on and off. This trait exposes exactly that.

/// UART peripheral as seen by the syslink transport
///
/// All methods are expected to be cheap register accesses; none of them may
/// block. They are called both from task context (inside a critical section)
/// and from the peripheral's interrupt handler.
pub trait SerialPort {
    /// Apply baud rate and frame format
    ///
    /// Called once while the peripheral is disabled.
    fn configure(&mut self, config: &UartConfig);

    /// Enable or disable the peripheral
    fn set_enabled(&mut self, enabled: bool);

    /// Snapshot of the status register
    fn status(&self) -> UartStatus;

    /// Read the data register
    ///
    /// Reading after [`status`](Self::status) also clears the idle and
    /// error flags (the status-then-data sequence).
    fn read_data(&mut self) -> u8;

    /// Write one byte to the data register
    fn write_data(&mut self, byte: u8);

    /// Enable or disable an interrupt source
    fn set_interrupt(&mut self, irq: UartInterrupt, enabled: bool);

    /// Check whether an interrupt source is enabled
    fn is_interrupt_enabled(&self, irq: UartInterrupt) -> bool;

    /// Enable or disable DMA requests in one direction
    fn set_dma_request(&mut self, direction: DmaDirection, enabled: bool);

    /// Clear the transmission-complete flag
    fn clear_transmit_complete(&mut self);
}

/// UART status flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartStatus {
    /// Receive data register holds a byte
    pub rx_not_empty: bool,
    /// Line went idle after activity
    pub idle: bool,
    /// Transmit data register can accept a byte
    pub tx_empty: bool,
    /// Receive overrun
    pub overrun: bool,
    /// Framing error
    pub framing_error: bool,
    /// Noise detected on the line
    pub noise: bool,
    /// Parity error
    pub parity_error: bool,
}

impl UartStatus {
    /// Check if any line error flag is set
    pub fn has_error(&self) -> bool {
        self.overrun || self.framing_error || self.noise || self.parity_error
    }
}

/// UART interrupt sources used by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartInterrupt {
    /// A byte arrived in the data register
    RxNotEmpty,
    /// The line went idle
    Idle,
    /// The data register can accept the next byte
    TxEmpty,
}

/// DMA request direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaDirection {
    /// Peripheral to memory
    Rx,
    /// Memory to peripheral
    Tx,
}

/// UART configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Enabled directions
    pub mode: UartMode,
}

impl UartConfig {
    /// Baud rate of the syslink between the two processors
    pub const SYSLINK_BAUDRATE: u32 = 1_000_000;

    /// Baud rate used when the link carries trace output instead of syslink
    pub const TRACE_BAUDRATE: u32 = 2_000_000;

    /// Transmit-only configuration for raw trace/debug output
    pub const fn trace_output() -> Self {
        Self {
            baudrate: Self::TRACE_BAUDRATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            mode: UartMode::TxOnly,
        }
    }
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: Self::SYSLINK_BAUDRATE,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            mode: UartMode::RxTx,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum DataBits {
    Seven,
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum StopBits {
    One,
    Two,
}

/// Enabled transfer directions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub enum UartMode {
    /// Receive and transmit
    RxTx,
    /// Transmit only
    TxOnly,
}

impl UartMode {
    /// Check if the receiver is enabled in this mode
    pub fn receives(&self) -> bool {
        matches!(self, UartMode::RxTx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_syslink_8n1() {
        let config = UartConfig::default();
        assert_eq!(config.baudrate, 1_000_000);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert!(config.mode.receives());
    }

    #[test]
    fn test_trace_output_is_transmit_only() {
        let config = UartConfig::trace_output();
        assert_eq!(config.baudrate, 2_000_000);
        assert!(!config.mode.receives());
    }

    #[test]
    fn test_status_errors() {
        assert!(!UartStatus::default().has_error());
        let status = UartStatus {
            overrun: true,
            ..Default::default()
        };
        assert!(status.has_error());
    }
}
