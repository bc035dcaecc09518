//! DMA stream abstraction
//!
//! A stream is bound to one peripheral request line and to a fixed memory
//! window it owns for its whole life. The transport never borrows that
//! window: it copies into it (transmit) or out of it (receive) only while the
//! stream is disabled, and it programs transfers as an offset into the window
//! plus a count, which is how the hardware sees them too.

/// One DMA stream and the memory window it transfers from or into
pub trait DmaStream {
    /// Size of the memory window in bytes
    fn capacity(&self) -> usize;

    /// Copy `bytes` into the window starting at `offset`
    ///
    /// Must only be used while the stream is disabled.
    fn write_memory(&mut self, offset: usize, bytes: &[u8]);

    /// Copy `out.len()` bytes out of the window starting at `offset`
    fn read_memory(&self, offset: usize, out: &mut [u8]);

    /// Set every byte of the window to `value`
    ///
    /// Must only be used while the stream is disabled.
    fn fill_memory(&mut self, value: u8);

    /// Point the memory address register `offset` bytes into the window
    fn set_memory_offset(&mut self, offset: usize);

    /// Load the transfer counter
    fn set_transfer_count(&mut self, count: usize);

    /// Current value of the transfer counter (items not yet moved)
    fn remaining(&self) -> usize;

    /// Start (or restart) the stream
    fn enable(&mut self);

    /// Request the stream to stop
    ///
    /// The hardware may take a few cycles to acknowledge; poll
    /// [`is_enabled`](Self::is_enabled) to observe it.
    fn disable(&mut self);

    /// Check whether the stream is still running
    fn is_enabled(&self) -> bool;

    /// Enable or disable the transfer-complete interrupt
    fn set_complete_interrupt(&mut self, enabled: bool);

    /// Clear all pending event flags of the stream
    fn clear_flags(&mut self);
}
