//! UART transport driver
//!
//! One [`Transport`] owns one physical link. It is meant to live in a
//! `static` so the interrupt vectors can reach it:
//!
//! ```text
//!   USART IRQ ──► on_uart_interrupt ──┬─► byte queue ──► receive_with_timeout
//!                                     └─► receive_done ─┐
//!   RX DMA IRQ ─► on_rx_dma_complete ───► receive_done ─┴► get_available_data
//!   TX DMA IRQ ─► on_tx_dma_complete ───► send_done ────► send_dma_blocking
//!   EXTI IRQ ───► on_flow_control_edge ─► pause/resume TX DMA
//! ```
//!
//! Register state lives behind a critical-section mutex and is only touched
//! inside short critical sections. Interrupt handlers never wait on anything
//! but the hardware acknowledging a stream disable.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex as BlockingMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Duration};
use heapless::Vec;

use syslink_hal::{
    DmaDirection, DmaStream, Edge, EdgeInterruptPin, InputPin, SerialPort, UartInterrupt,
};
use syslink_protocol::is_plausible_frame;

use crate::config::LinkConfig;
use crate::error::TransportError;
use crate::link::Link;
use crate::spin::spin_until;
use crate::stats::LinkStats;

/// Capacity of the byte-at-a-time receive queue
pub const BYTE_QUEUE_SIZE: usize = 1024;

/// Received bytes held for the consumer between polls
pub const RX_STAGING_SIZE: usize = 256;

/// Largest transfer accepted by [`Transport::send_isr_blocking`]
pub const ISR_TX_CAPACITY: usize = 128;

/// Bursts longer than this are counted as suspicious
const LARGE_BURST: usize = 32;

/// Hardware owned by the transport
pub struct Peripherals<P, R, T, F> {
    /// The UART
    pub port: P,
    /// Stream moving received bytes into memory
    pub rx_dma: R,
    /// Stream moving bytes to the UART
    pub tx_dma: T,
    /// Flow-control input driven by the peer (high = stop sending)
    pub flow_control: F,
}

/// Progress of the transmit stream across a flow-control pause
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DmaPauseState {
    /// The stream was stopped by the peer and not yet restarted
    pub is_paused: bool,
    /// Bytes in the transfer when it was started
    pub initial_count: usize,
    /// Bytes not yet sent when the stream was stopped
    pub remaining_count: usize,
}

/// Data for the interrupt-driven transmit path
struct IsrTransmit {
    data: Vec<u8, ISR_TX_CAPACITY>,
    index: usize,
}

impl IsrTransmit {
    const fn new() -> Self {
        Self {
            data: Vec::new(),
            index: 0,
        }
    }

    fn next(&mut self) -> Option<u8> {
        let byte = self.data.get(self.index).copied()?;
        self.index += 1;
        Some(byte)
    }
}

/// State of an initialized transport
struct Active<P, R, T, F> {
    hw: Peripherals<P, R, T, F>,
    config: LinkConfig,
    pause: DmaPauseState,
    received: Vec<u8, RX_STAGING_SIZE>,
    isr_tx: IsrTransmit,
    stats: LinkStats,
}

/// Result of one UART interrupt
enum UartEvent {
    None,
    ReceiveDone,
    SendDone,
}

/// UART transport with DMA transmit/receive and flow control
pub struct Transport<P, R, T, F> {
    active: BlockingMutex<CriticalSectionRawMutex, RefCell<Option<Active<P, R, T, F>>>>,
    /// Held by the task that owns the transmitter
    tx_busy: Mutex<CriticalSectionRawMutex, ()>,
    /// Released when a transmit finishes
    send_done: Signal<CriticalSectionRawMutex, ()>,
    /// Released when a receive cycle completes; one waiter only
    receive_done: Signal<CriticalSectionRawMutex, ()>,
    bytes: Channel<CriticalSectionRawMutex, u8, BYTE_QUEUE_SIZE>,
}

impl<P, R, T, F> Transport<P, R, T, F> {
    /// Create an uninitialized transport
    pub const fn new() -> Self {
        Self {
            active: BlockingMutex::new(RefCell::new(None)),
            tx_busy: Mutex::new(()),
            send_done: Signal::new(),
            receive_done: Signal::new(),
            bytes: Channel::new(),
        }
    }
}

impl<P, R, T, F> Default for Transport<P, R, T, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, R, T, F> Transport<P, R, T, F>
where
    P: SerialPort,
    R: DmaStream,
    T: DmaStream,
    F: EdgeInterruptPin,
{
    /// Configure the hardware and start receiving
    ///
    /// Must be called before any other operation; until then they return
    /// [`TransportError::NotReady`] and the interrupt entry points do nothing.
    pub fn initialize(
        &self,
        mut hw: Peripherals<P, R, T, F>,
        config: LinkConfig,
    ) -> Result<(), TransportError> {
        self.active.lock(|cell| {
            let mut slot = cell.borrow_mut();
            if slot.is_some() {
                return Err(TransportError::AlreadyInitialized);
            }

            // Nothing from a previous session may leak into this one
            self.send_done.reset();
            self.receive_done.reset();
            while self.bytes.try_receive().is_ok() {}

            hw.port.set_enabled(false);
            hw.port.configure(&config.uart);

            hw.tx_dma.disable();
            spin_until(|| !hw.tx_dma.is_enabled());
            hw.tx_dma.clear_flags();

            if config.uart.mode.receives() {
                hw.rx_dma.disable();
                spin_until(|| !hw.rx_dma.is_enabled());
                hw.rx_dma.fill_memory(0);
                hw.rx_dma.set_complete_interrupt(true);
                arm_receive(&mut hw.rx_dma);
                hw.port.set_dma_request(DmaDirection::Rx, true);
                hw.port.set_interrupt(UartInterrupt::Idle, true);
                if config.byte_interrupts {
                    hw.port.set_interrupt(UartInterrupt::RxNotEmpty, true);
                }
            }

            hw.flow_control.clear_pending();
            hw.flow_control.enable_edge_interrupt(Edge::Both);
            hw.port.set_enabled(true);

            *slot = Some(Active {
                hw,
                config,
                pause: DmaPauseState::default(),
                received: Vec::new(),
                isr_tx: IsrTransmit::new(),
                stats: LinkStats::default(),
            });
            Ok(())
        })?;

        info!("syslink transport up at {} baud", config.uart.baudrate);
        Ok(())
    }

    /// Stop the link and hand the hardware back
    ///
    /// A task blocked in a transmit stays blocked; shut down only when no
    /// sender is active.
    pub fn shutdown(&self) -> Option<Peripherals<P, R, T, F>> {
        let active = self.active.lock(|cell| cell.borrow_mut().take())?;
        let mut hw = active.hw;

        hw.flow_control.disable_edge_interrupt();
        for irq in [
            UartInterrupt::RxNotEmpty,
            UartInterrupt::Idle,
            UartInterrupt::TxEmpty,
        ] {
            hw.port.set_interrupt(irq, false);
        }
        hw.port.set_dma_request(DmaDirection::Rx, false);
        hw.port.set_dma_request(DmaDirection::Tx, false);

        stop_stream(&mut hw.rx_dma);
        stop_stream(&mut hw.tx_dma);
        hw.port.set_enabled(false);

        info!("syslink transport down");
        Some(hw)
    }

    /// Check whether the transport has been initialized
    pub fn is_ready(&self) -> bool {
        self.active.lock(|cell| cell.borrow().is_some())
    }

    /// Counters since initialization
    pub fn stats(&self) -> Result<LinkStats, TransportError> {
        self.with_active(|active| active.stats)
    }

    /// Current flow-control pause state of the transmit stream
    pub fn pause_state(&self) -> Result<DmaPauseState, TransportError> {
        self.with_active(|active| active.pause)
    }

    fn with_active<Ret>(
        &self,
        f: impl FnOnce(&mut Active<P, R, T, F>) -> Ret,
    ) -> Result<Ret, TransportError> {
        self.active.lock(|cell| {
            cell.borrow_mut()
                .as_mut()
                .map(f)
                .ok_or(TransportError::NotReady)
        })
    }

    fn wait_tx_empty(&self) {
        spin_until(|| {
            self.with_active(|active| active.hw.port.status().tx_empty)
                .unwrap_or(true)
        });
    }

    // ---- Transmit ----

    /// Send `bytes` by polling the transmit-empty flag
    ///
    /// For small, infrequent output only: the caller spins for the whole
    /// transfer and there is no timeout.
    pub fn send_blocking_low_rate(&self, bytes: &[u8]) -> Result<(), TransportError> {
        let spin_on_flow_control = self.with_active(|active| active.config.spin_on_flow_control)?;

        for &byte in bytes {
            if spin_on_flow_control {
                spin_until(|| {
                    self.with_active(|active| active.hw.flow_control.is_low())
                        .unwrap_or(true)
                });
            }
            self.wait_tx_empty();
            self.with_active(|active| active.hw.port.write_data(byte))?;
        }
        Ok(())
    }

    /// Send one byte with [`send_blocking_low_rate`](Self::send_blocking_low_rate)
    pub fn putchar(&self, byte: u8) -> Result<(), TransportError> {
        self.send_blocking_low_rate(&[byte])
    }

    /// Send `bytes` from the transmit-empty interrupt
    ///
    /// Waits until the interrupt handler has written the last byte.
    pub async fn send_isr_blocking(&self, bytes: &[u8]) -> Result<(), TransportError> {
        if !self.is_ready() {
            return Err(TransportError::NotReady);
        }
        if bytes.len() > ISR_TX_CAPACITY {
            return Err(TransportError::FrameTooLarge);
        }
        let Some(&first) = bytes.first() else {
            return Ok(());
        };

        let _busy = self.tx_busy.lock().await;
        self.wait_tx_empty();
        self.send_done.reset();

        self.with_active(|active| {
            active.isr_tx.data.clear();
            // Length checked above
            let _ = active.isr_tx.data.extend_from_slice(bytes);
            active.isr_tx.index = 1;
            active.hw.port.write_data(first);
            active.hw.port.set_interrupt(UartInterrupt::TxEmpty, true);
        })?;

        self.send_done.wait().await;
        let _ = self.with_active(|active| active.isr_tx.data.clear());
        Ok(())
    }

    /// Send `bytes` through the transmit DMA stream
    ///
    /// Callers are serialized on the transmit lock, so at most one transfer
    /// is in flight. Returns once the completion interrupt has fired. There
    /// is no timeout: a stalled peripheral, or a peer that never releases
    /// flow control, blocks the caller indefinitely.
    pub async fn send_dma_blocking(&self, bytes: &[u8]) -> Result<(), TransportError> {
        if !self.is_ready() {
            return Err(TransportError::NotReady);
        }
        if bytes.is_empty() {
            return Ok(());
        }

        let _busy = self.tx_busy.lock().await;

        // The previous transfer may still be retiring
        spin_until(|| {
            self.with_active(|active| !active.hw.tx_dma.is_enabled())
                .unwrap_or(true)
        });
        self.send_done.reset();

        self.with_active(|active| {
            let hw = &mut active.hw;
            let count = bytes.len();
            if count > hw.tx_dma.capacity() {
                return Err(TransportError::FrameTooLarge);
            }

            hw.tx_dma.write_memory(0, bytes);
            hw.tx_dma.set_memory_offset(0);
            hw.tx_dma.set_transfer_count(count);
            active.pause = DmaPauseState {
                is_paused: false,
                initial_count: count,
                remaining_count: count,
            };

            hw.tx_dma.set_complete_interrupt(true);
            hw.tx_dma.clear_flags();
            hw.port.set_dma_request(DmaDirection::Tx, true);
            hw.port.clear_transmit_complete();
            hw.tx_dma.enable();
            Ok(())
        })??;

        self.send_done.wait().await;
        Ok(())
    }

    /// Transmit DMA transfer-complete interrupt
    pub fn on_tx_dma_complete(&self) {
        let completed = self
            .with_active(|active| {
                let hw = &mut active.hw;
                hw.tx_dma.set_complete_interrupt(false);
                hw.tx_dma.clear_flags();
                hw.port.set_dma_request(DmaDirection::Tx, false);
                hw.tx_dma.disable();
                active.pause.remaining_count = 0;
            })
            .is_ok();

        if completed {
            self.send_done.signal(());
        }
    }

    // ---- Flow control ----

    /// Stop the transmit stream where it is
    ///
    /// Does nothing when no transfer is running.
    pub fn pause_transmit_dma(&self) {
        let finished = self
            .with_active(|active| {
                let hw = &mut active.hw;
                if !hw.tx_dma.is_enabled() {
                    return false;
                }

                hw.tx_dma.set_complete_interrupt(false);
                hw.tx_dma.disable();
                spin_until(|| !hw.tx_dma.is_enabled());
                hw.tx_dma.clear_flags();

                let remaining = hw.tx_dma.remaining();
                if remaining == 0 {
                    // Stopped on the last byte: nothing left to resume
                    hw.port.set_dma_request(DmaDirection::Tx, false);
                    active.pause.remaining_count = 0;
                    return true;
                }

                active.pause.remaining_count = remaining;
                active.pause.is_paused = true;
                active.stats.tx_pauses = active.stats.tx_pauses.saturating_add(1);
                trace!("tx paused, {} bytes left", remaining);
                false
            })
            .unwrap_or(false);

        if finished {
            self.send_done.signal(());
        }
    }

    /// Restart a paused transmit stream from the first unsent byte
    ///
    /// Does nothing unless the stream was paused.
    pub fn resume_transmit_dma(&self) {
        let _ = self.with_active(|active| {
            let pause = &mut active.pause;
            if !pause.is_paused {
                return;
            }

            let hw = &mut active.hw;
            let offset = pause.initial_count - pause.remaining_count;
            hw.tx_dma.set_transfer_count(pause.remaining_count);
            hw.tx_dma.set_memory_offset(offset);
            hw.tx_dma.set_complete_interrupt(true);
            hw.port.clear_transmit_complete();
            hw.tx_dma.enable();
            pause.is_paused = false;
            trace!("tx resumed at offset {}", offset);
        });
    }

    /// Flow-control line edge interrupt
    pub fn on_flow_control_edge(&self) {
        let asserted = self.with_active(|active| {
            active.hw.flow_control.clear_pending();
            active.hw.flow_control.is_high()
        });

        match asserted {
            Ok(true) => self.pause_transmit_dma(),
            Ok(false) => self.resume_transmit_dma(),
            Err(_) => {}
        }
    }

    // ---- Receive ----

    /// Wait up to `timeout` for a byte from the byte queue
    ///
    /// Returns `Ok(None)` when nothing arrived in time.
    pub async fn receive_with_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<u8>, TransportError> {
        if !self.is_ready() {
            return Err(TransportError::NotReady);
        }
        Ok(with_timeout(timeout, self.bytes.receive()).await.ok())
    }

    /// [`receive_with_timeout`](Self::receive_with_timeout) with the configured timeout
    pub async fn receive_byte(&self) -> Result<Option<u8>, TransportError> {
        let timeout = self.with_active(|active| active.config.receive_timeout())?;
        self.receive_with_timeout(timeout).await
    }

    /// Move received DMA data into `out`
    ///
    /// Returns the number of bytes copied. Bytes that do not fit stay
    /// staged for the next call.
    pub fn get_available_data(&self, out: &mut [u8]) -> Result<usize, TransportError> {
        self.with_active(|active| {
            let received = &mut active.received;
            let count = out.len().min(received.len());
            out[..count].copy_from_slice(&received[..count]);

            let rest = received.len() - count;
            received.copy_within(count.., 0);
            received.truncate(rest);
            count
        })
    }

    /// Wait for the next receive cycle, then drain like
    /// [`get_available_data`](Self::get_available_data)
    ///
    /// Only one task may wait here at a time.
    pub async fn receive_dma_blocking(&self, out: &mut [u8]) -> Result<usize, TransportError> {
        if !self.is_ready() {
            return Err(TransportError::NotReady);
        }
        self.receive_done.wait().await;
        self.get_available_data(out)
    }

    /// Receive DMA transfer-complete interrupt
    pub fn on_rx_dma_complete(&self) {
        let completed = self.with_active(|active| {
            if !active.config.uart.mode.receives() {
                return false;
            }
            active.complete_receive();
            true
        });
        if completed == Ok(true) {
            self.receive_done.signal(());
        }
    }

    /// UART interrupt
    ///
    /// Handles, in priority order: a received byte, the idle line, the next
    /// interrupt-driven transmit byte, and line errors.
    pub fn on_uart_interrupt(&self) {
        let event = self.with_active(|active| {
            let port = &mut active.hw.port;
            let status = port.status();

            if status.rx_not_empty && port.is_interrupt_enabled(UartInterrupt::RxNotEmpty) {
                let byte = port.read_data();
                if self.bytes.try_send(byte).is_err() {
                    active.stats.byte_queue_drops = active.stats.byte_queue_drops.saturating_add(1);
                    warn!("byte queue full, dropped {=u8:#x}", byte);
                }
                UartEvent::None
            } else if status.idle && port.is_interrupt_enabled(UartInterrupt::Idle) {
                // Status-then-data read clears the idle flag
                let _ = port.read_data();
                active.complete_receive();
                UartEvent::ReceiveDone
            } else if status.tx_empty && port.is_interrupt_enabled(UartInterrupt::TxEmpty) {
                match active.isr_tx.next() {
                    Some(byte) => {
                        port.write_data(byte);
                        UartEvent::None
                    }
                    None => {
                        port.set_interrupt(UartInterrupt::TxEmpty, false);
                        UartEvent::SendDone
                    }
                }
            } else {
                // Overrun, framing, noise, parity: cleared by status-then-data
                let _ = port.read_data();
                if status.has_error() {
                    active.stats.uart_errors = active.stats.uart_errors.saturating_add(1);
                }
                UartEvent::None
            }
        });

        match event {
            Ok(UartEvent::ReceiveDone) => self.receive_done.signal(()),
            Ok(UartEvent::SendDone) => self.send_done.signal(()),
            Ok(UartEvent::None) | Err(_) => {}
        }
    }
}

impl<P, R: DmaStream, T, F> Active<P, R, T, F> {
    /// Stage what the receive stream collected and restart it
    fn complete_receive(&mut self) {
        let rx = &mut self.hw.rx_dma;
        rx.disable();
        spin_until(|| !rx.is_enabled());

        let valid = rx.capacity().saturating_sub(rx.remaining());
        if valid > LARGE_BURST {
            self.stats.rx_large_bursts = self.stats.rx_large_bursts.saturating_add(1);
            debug!("large receive burst: {} bytes", valid);
        }

        let start = self.received.len();
        let kept = valid.min(RX_STAGING_SIZE - start);
        // Cannot fail: kept fits the free capacity
        let _ = self.received.resize(start + kept, 0);
        rx.read_memory(0, &mut self.received[start..]);

        if valid > 0 && (kept < valid || !is_plausible_frame(&self.received[start..])) {
            self.stats.rx_invalid_bursts = self.stats.rx_invalid_bursts.saturating_add(1);
            debug!("receive burst is not a single frame ({} bytes)", valid);
        }
        if kept < valid {
            let dropped = (valid - kept) as u32;
            self.stats.rx_overflow_bytes = self.stats.rx_overflow_bytes.saturating_add(dropped);
            warn!("receive staging full, dropped {} bytes", dropped);
        }

        rx.fill_memory(0);
        arm_receive(rx);
        self.stats.rx_transfers = self.stats.rx_transfers.saturating_add(1);
    }
}

fn stop_stream<S: DmaStream>(stream: &mut S) {
    stream.set_complete_interrupt(false);
    stream.disable();
    spin_until(|| !stream.is_enabled());
    stream.clear_flags();
}

/// Point the receive stream at the start of its buffer and start it
fn arm_receive<R: DmaStream>(rx: &mut R) {
    let capacity = rx.capacity();
    rx.clear_flags();
    rx.set_memory_offset(0);
    rx.set_transfer_count(capacity);
    rx.enable();
}

impl<P, R, T, F> Link for Transport<P, R, T, F>
where
    P: SerialPort,
    R: DmaStream,
    T: DmaStream,
    F: EdgeInterruptPin,
{
    fn is_ready(&self) -> bool {
        Transport::is_ready(self)
    }

    async fn send_dma_blocking(&self, bytes: &[u8]) -> Result<(), TransportError> {
        Transport::send_dma_blocking(self, bytes).await
    }

    fn get_available_data(&self, out: &mut [u8]) -> Result<usize, TransportError> {
        Transport::get_available_data(self, out)
    }
}
