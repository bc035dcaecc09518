//! Recording mocks of the HAL traits for host tests
//!
//! Each mock keeps its register state behind an `Rc<RefCell<_>>` shared with
//! the test, which plays the part of the hardware: it moves bytes through the
//! DMA streams, raises status flags and toggles the flow-control line.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use syslink_hal::{
    DmaDirection, DmaStream, Edge, EdgeInterruptPin, InputPin, SerialPort, UartConfig,
    UartInterrupt, UartStatus,
};

use crate::transport::{Peripherals, Transport};

pub type MockTransport = Transport<MockPort, MockDma, MockDma, MockPin>;

#[derive(Debug, Default)]
pub struct PortState {
    pub config: Option<UartConfig>,
    pub enabled: bool,
    /// Idle and error flags raised by the test
    pub flags: UartStatus,
    /// Bytes waiting in the receive data register
    pub rx_data: VecDeque<u8>,
    /// Bytes written to the transmit data register
    pub written: Vec<u8>,
    pub rx_not_empty_irq: bool,
    pub idle_irq: bool,
    pub tx_empty_irq: bool,
    pub dma_rx: bool,
    pub dma_tx: bool,
    pub tc_clears: usize,
}

pub struct MockPort {
    pub state: Rc<RefCell<PortState>>,
}

impl SerialPort for MockPort {
    fn configure(&mut self, config: &UartConfig) {
        self.state.borrow_mut().config = Some(*config);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().enabled = enabled;
    }

    fn status(&self) -> UartStatus {
        let state = self.state.borrow();
        UartStatus {
            rx_not_empty: !state.rx_data.is_empty(),
            tx_empty: true,
            ..state.flags
        }
    }

    fn read_data(&mut self) -> u8 {
        let mut state = self.state.borrow_mut();
        state.flags = UartStatus::default();
        state.rx_data.pop_front().unwrap_or(0)
    }

    fn write_data(&mut self, byte: u8) {
        self.state.borrow_mut().written.push(byte);
    }

    fn set_interrupt(&mut self, irq: UartInterrupt, enabled: bool) {
        let mut state = self.state.borrow_mut();
        match irq {
            UartInterrupt::RxNotEmpty => state.rx_not_empty_irq = enabled,
            UartInterrupt::Idle => state.idle_irq = enabled,
            UartInterrupt::TxEmpty => state.tx_empty_irq = enabled,
        }
    }

    fn is_interrupt_enabled(&self, irq: UartInterrupt) -> bool {
        let state = self.state.borrow();
        match irq {
            UartInterrupt::RxNotEmpty => state.rx_not_empty_irq,
            UartInterrupt::Idle => state.idle_irq,
            UartInterrupt::TxEmpty => state.tx_empty_irq,
        }
    }

    fn set_dma_request(&mut self, direction: DmaDirection, enabled: bool) {
        let mut state = self.state.borrow_mut();
        match direction {
            DmaDirection::Rx => state.dma_rx = enabled,
            DmaDirection::Tx => state.dma_tx = enabled,
        }
    }

    fn clear_transmit_complete(&mut self) {
        self.state.borrow_mut().tc_clears += 1;
    }
}

#[derive(Debug, Default)]
pub struct DmaState {
    pub memory: Vec<u8>,
    pub offset: usize,
    /// Count loaded by the last `set_transfer_count`
    pub programmed: usize,
    pub remaining: usize,
    pub enabled: bool,
    pub complete_interrupt: bool,
    pub complete_pending: bool,
    /// Bytes moved out of memory (transmit streams)
    pub moved_out: Vec<u8>,
}

impl DmaState {
    fn position(&self) -> usize {
        self.offset + (self.programmed - self.remaining)
    }

    fn finish_if_done(&mut self) {
        if self.remaining == 0 {
            self.enabled = false;
            self.complete_pending = true;
        }
    }

    /// Move up to `count` bytes from memory to the peripheral
    pub fn transmit(&mut self, count: usize) -> usize {
        let mut moved = 0;
        while self.enabled && self.remaining > 0 && moved < count {
            let byte = self.memory[self.position()];
            self.moved_out.push(byte);
            self.remaining -= 1;
            moved += 1;
            self.finish_if_done();
        }
        moved
    }

    /// Move bytes from the peripheral into memory
    pub fn receive(&mut self, bytes: &[u8]) -> usize {
        let mut moved = 0;
        for &byte in bytes {
            if !self.enabled || self.remaining == 0 {
                break;
            }
            let position = self.position();
            self.memory[position] = byte;
            self.remaining -= 1;
            moved += 1;
            self.finish_if_done();
        }
        moved
    }
}

pub struct MockDma {
    pub state: Rc<RefCell<DmaState>>,
}

impl DmaStream for MockDma {
    fn capacity(&self) -> usize {
        self.state.borrow().memory.len()
    }

    fn write_memory(&mut self, offset: usize, bytes: &[u8]) {
        let mut state = self.state.borrow_mut();
        assert!(!state.enabled, "memory written while stream enabled");
        state.memory[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    fn read_memory(&self, offset: usize, out: &mut [u8]) {
        let state = self.state.borrow();
        out.copy_from_slice(&state.memory[offset..offset + out.len()]);
    }

    fn fill_memory(&mut self, value: u8) {
        let mut state = self.state.borrow_mut();
        assert!(!state.enabled, "memory cleared while stream enabled");
        state.memory.fill(value);
    }

    fn set_memory_offset(&mut self, offset: usize) {
        let mut state = self.state.borrow_mut();
        assert!(!state.enabled, "address changed while stream enabled");
        state.offset = offset;
    }

    fn set_transfer_count(&mut self, count: usize) {
        let mut state = self.state.borrow_mut();
        assert!(!state.enabled, "count changed while stream enabled");
        state.programmed = count;
        state.remaining = count;
    }

    fn remaining(&self) -> usize {
        self.state.borrow().remaining
    }

    fn enable(&mut self) {
        self.state.borrow_mut().enabled = true;
    }

    fn disable(&mut self) {
        self.state.borrow_mut().enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.state.borrow().enabled
    }

    fn set_complete_interrupt(&mut self, enabled: bool) {
        self.state.borrow_mut().complete_interrupt = enabled;
    }

    fn clear_flags(&mut self) {
        self.state.borrow_mut().complete_pending = false;
    }
}

#[derive(Debug, Default)]
pub struct PinState {
    pub high: bool,
    pub edge: Option<Edge>,
    pub pending_clears: usize,
    /// Drop the line after this many more reads
    pub release_after: Option<usize>,
    /// Bytes the port had written when the line was dropped
    pub written_at_release: Option<usize>,
}

pub struct MockPin {
    pub state: Rc<RefCell<PinState>>,
    port: Rc<RefCell<PortState>>,
}

impl InputPin for MockPin {
    fn is_high(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if let Some(reads) = state.release_after {
            if reads == 0 {
                state.high = false;
                state.release_after = None;
                state.written_at_release = Some(self.port.borrow().written.len());
            } else {
                state.release_after = Some(reads - 1);
            }
        }
        state.high
    }
}

impl EdgeInterruptPin for MockPin {
    fn enable_edge_interrupt(&mut self, edge: Edge) {
        self.state.borrow_mut().edge = Some(edge);
    }

    fn disable_edge_interrupt(&mut self) {
        self.state.borrow_mut().edge = None;
    }

    fn clear_pending(&mut self) {
        self.state.borrow_mut().pending_clears += 1;
    }
}

/// Test-side handles on the mocked registers
pub struct MockHardware {
    pub port: Rc<RefCell<PortState>>,
    pub rx: Rc<RefCell<DmaState>>,
    pub tx: Rc<RefCell<DmaState>>,
    pub flow: Rc<RefCell<PinState>>,
}

impl MockHardware {
    pub fn new(
        rx_capacity: usize,
        tx_capacity: usize,
    ) -> (Self, Peripherals<MockPort, MockDma, MockDma, MockPin>) {
        let hardware = Self {
            port: Rc::new(RefCell::new(PortState::default())),
            rx: Rc::new(RefCell::new(DmaState {
                memory: std::vec![0; rx_capacity],
                ..Default::default()
            })),
            tx: Rc::new(RefCell::new(DmaState {
                memory: std::vec![0; tx_capacity],
                ..Default::default()
            })),
            flow: Rc::new(RefCell::new(PinState::default())),
        };
        let peripherals = Peripherals {
            port: MockPort {
                state: hardware.port.clone(),
            },
            rx_dma: MockDma {
                state: hardware.rx.clone(),
            },
            tx_dma: MockDma {
                state: hardware.tx.clone(),
            },
            flow_control: MockPin {
                state: hardware.flow.clone(),
                port: hardware.port.clone(),
            },
        };
        (hardware, peripherals)
    }

    /// Line goes idle after `bytes` arrived through the receive stream
    pub fn receive_burst(&self, bytes: &[u8]) -> usize {
        let moved = self.rx.borrow_mut().receive(bytes);
        self.port.borrow_mut().flags.idle = true;
        moved
    }

    /// Move up to `count` bytes out of the transmit stream
    pub fn transmit(&self, count: usize) -> usize {
        self.tx.borrow_mut().transmit(count)
    }

    /// Transfer-complete flag of the transmit stream
    pub fn tx_complete_pending(&self) -> bool {
        let tx = self.tx.borrow();
        tx.complete_pending && tx.complete_interrupt
    }

    pub fn wire(&self) -> Vec<u8> {
        self.tx.borrow().moved_out.clone()
    }

    pub fn set_flow_control(&self, asserted: bool) {
        self.flow.borrow_mut().high = asserted;
    }

    /// Peer holds flow control for `reads` more reads of the line
    pub fn hold_flow_control(&self, reads: usize) {
        let mut flow = self.flow.borrow_mut();
        flow.high = true;
        flow.release_after = Some(reads);
    }
}
