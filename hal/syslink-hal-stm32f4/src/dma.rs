//! DMA2 stream driver
//!
//! Each stream owns a `'static` buffer and moves bytes between it and the
//! USART6 data register. The buffer is only copied into or out of while the
//! stream is disabled.

use core::sync::atomic::{compiler_fence, Ordering};

use embassy_stm32::pac;
use embassy_stm32::pac::dma::vals::{Dir, Pl, Size};
use syslink_hal::DmaStream;

use crate::uart::Usart6;

/// DMA2 request channel of USART6 on streams 1 and 7
const USART6_CHANNEL: u8 = 5;
const RX_STREAM: usize = 1;
const TX_STREAM: usize = 7;

/// One DMA2 stream serving USART6
pub struct Dma2Stream<const N: usize> {
    index: usize,
    buffer: &'static mut [u8; N],
    /// Transmit completion is signalled by USART6 TC
    tx: bool,
}

impl<const N: usize> Dma2Stream<N> {
    /// Stream 1: USART6 receive into `buffer`
    pub fn usart6_rx(buffer: &'static mut [u8; N]) -> Self {
        Self::new(RX_STREAM, Dir::PERIPHERAL_TO_MEMORY, buffer, false)
    }

    /// Stream 7: USART6 transmit from `buffer`
    pub fn usart6_tx(buffer: &'static mut [u8; N]) -> Self {
        Self::new(TX_STREAM, Dir::MEMORY_TO_PERIPHERAL, buffer, true)
    }

    fn new(index: usize, dir: Dir, buffer: &'static mut [u8; N], tx: bool) -> Self {
        pac::RCC.ahb1enr().modify(|w| w.set_dma2en(true));

        let st = pac::DMA2.st(index);
        st.cr().modify(|w| w.set_en(false));
        while st.cr().read().en() {}

        st.par().write_value(Usart6::data_register());
        st.m0ar().write_value(buffer.as_ptr() as u32);
        st.cr().write(|w| {
            w.set_chsel(USART6_CHANNEL);
            w.set_dir(dir);
            w.set_minc(true);
            w.set_pinc(false);
            w.set_msize(Size::BITS8);
            w.set_psize(Size::BITS8);
            w.set_pl(Pl::HIGH);
            w.set_circ(false);
        });

        let mut stream = Self { index, buffer, tx };
        stream.clear_flags();
        stream
    }

    fn regs(&self) -> pac::dma::St {
        pac::DMA2.st(self.index)
    }
}

impl<const N: usize> DmaStream for Dma2Stream<N> {
    fn capacity(&self) -> usize {
        N
    }

    fn write_memory(&mut self, offset: usize, bytes: &[u8]) {
        self.buffer[offset..offset + bytes.len()].copy_from_slice(bytes);
        compiler_fence(Ordering::SeqCst);
    }

    fn read_memory(&self, offset: usize, out: &mut [u8]) {
        compiler_fence(Ordering::SeqCst);
        out.copy_from_slice(&self.buffer[offset..offset + out.len()]);
    }

    fn fill_memory(&mut self, value: u8) {
        self.buffer.fill(value);
        compiler_fence(Ordering::SeqCst);
    }

    fn set_memory_offset(&mut self, offset: usize) {
        let address = self.buffer.as_ptr() as u32 + offset as u32;
        self.regs().m0ar().write_value(address);
    }

    fn set_transfer_count(&mut self, count: usize) {
        self.regs().ndtr().write(|w| w.set_ndt(count as u16));
    }

    fn remaining(&self) -> usize {
        self.regs().ndtr().read().ndt() as usize
    }

    fn enable(&mut self) {
        self.regs().cr().modify(|w| w.set_en(true));
    }

    fn disable(&mut self) {
        self.regs().cr().modify(|w| w.set_en(false));
    }

    fn is_enabled(&self) -> bool {
        self.regs().cr().read().en()
    }

    fn set_complete_interrupt(&mut self, enabled: bool) {
        // DMA2 vectors belong to embassy-stm32; see the crate docs
        if self.tx {
            pac::USART6.cr1().modify(|w| w.set_tcie(enabled));
        }
    }

    fn clear_flags(&mut self) {
        let bit = self.index % 4;
        pac::DMA2.ifcr(self.index / 4).write(|w| {
            w.set_tcif(bit, true);
            w.set_htif(bit, true);
            w.set_teif(bit, true);
            w.set_dmeif(bit, true);
            w.set_feif(bit, true);
        });
    }
}
