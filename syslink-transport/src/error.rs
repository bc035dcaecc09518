//! Transport errors

/// Errors returned by the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// The transport has not been initialized (or was shut down)
    NotReady,
    /// `initialize` was called on a running transport
    AlreadyInitialized,
    /// The data does not fit the transmit buffer
    FrameTooLarge,
}
