//! Busy-wait primitive

/// Spin until `ready` returns true
///
/// There is no timeout. A flag that never changes state hangs the caller;
/// every call site waits on hardware that acknowledges within a few bus
/// cycles, or on the transmit register of a running UART.
#[inline]
pub fn spin_until(mut ready: impl FnMut() -> bool) {
    while !ready() {
        core::hint::spin_loop();
    }
}
