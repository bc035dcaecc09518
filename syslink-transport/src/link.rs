//! Link abstraction used by the packet layer

use crate::error::TransportError;

/// Byte link the syslink packet layer runs over
///
/// Implemented by [`Transport`](crate::Transport); the packet layer is
/// written against this trait so it can be exercised without hardware.
#[allow(async_fn_in_trait)]
pub trait Link {
    /// Check whether the link has been initialized
    fn is_ready(&self) -> bool;

    /// Send `bytes` and wait until they are on the wire
    ///
    /// Callers are serialized; at most one transfer is in flight.
    async fn send_dma_blocking(&self, bytes: &[u8]) -> Result<(), TransportError>;

    /// Move whatever has been received since the last call into `out`
    ///
    /// Returns the number of bytes written, at most `out.len()`. Does not
    /// wait for data.
    fn get_available_data(&self, out: &mut [u8]) -> Result<usize, TransportError>;
}
