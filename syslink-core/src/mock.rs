//! In-memory link for host tests

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

use embassy_futures::yield_now;
use syslink_transport::{Link, TransportError};

/// Link that records sent bytes and serves queued incoming bytes
///
/// Sends move one byte per poll, so concurrent senders would interleave if
/// nothing above serialized them.
pub struct MockLink {
    pub ready: Cell<bool>,
    pub wire: RefCell<Vec<u8>>,
    pub incoming: RefCell<VecDeque<u8>>,
}

impl MockLink {
    pub fn new() -> Self {
        Self {
            ready: Cell::new(true),
            wire: RefCell::new(Vec::new()),
            incoming: RefCell::new(VecDeque::new()),
        }
    }

    pub fn push_incoming(&self, bytes: &[u8]) {
        self.incoming.borrow_mut().extend(bytes.iter().copied());
    }
}

impl Link for MockLink {
    fn is_ready(&self) -> bool {
        self.ready.get()
    }

    async fn send_dma_blocking(&self, bytes: &[u8]) -> Result<(), TransportError> {
        if !self.ready.get() {
            return Err(TransportError::NotReady);
        }
        for &byte in bytes {
            self.wire.borrow_mut().push(byte);
            yield_now().await;
        }
        Ok(())
    }

    fn get_available_data(&self, out: &mut [u8]) -> Result<usize, TransportError> {
        if !self.ready.get() {
            return Err(TransportError::NotReady);
        }
        let mut incoming = self.incoming.borrow_mut();
        let count = out.len().min(incoming.len());
        for (slot, byte) in out.iter_mut().zip(incoming.drain(..count)) {
            *slot = byte;
        }
        Ok(count)
    }
}
