//! GPIO pin abstractions
//!
//! The only pin the transport touches is the flow-control input driven by the
//! peer. It is read as a level and raises an interrupt on edges.

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Input pin wired to an edge interrupt line
pub trait EdgeInterruptPin: InputPin {
    /// Route the pin to its interrupt line and trigger on `edge`
    fn enable_edge_interrupt(&mut self, edge: Edge);

    /// Stop raising interrupts for this pin
    fn disable_edge_interrupt(&mut self);

    /// Acknowledge a pending edge
    fn clear_pending(&mut self);
}

/// Interrupt trigger edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Rising,
    Falling,
    Both,
}
