//! Link counters

/// Counters maintained by the transport
///
/// Purely diagnostic: none of them changes how the link behaves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Completed receive DMA cycles (transfer-complete or idle line)
    pub rx_transfers: u32,
    /// Receive bursts that were not exactly one well-formed frame
    pub rx_invalid_bursts: u32,
    /// Receive bursts longer than a typical single frame
    pub rx_large_bursts: u32,
    /// Received bytes dropped because the consumer fell behind
    pub rx_overflow_bytes: u32,
    /// Bytes dropped because the byte queue was full
    pub byte_queue_drops: u32,
    /// Overrun, framing, noise or parity errors cleared
    pub uart_errors: u32,
    /// Transmit transfers paused by the peer
    pub tx_pauses: u32,
}
