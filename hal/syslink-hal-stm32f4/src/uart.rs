//! USART6 register driver

use embassy_stm32::pac;
use embassy_stm32::pac::gpio::vals::Moder;
use embassy_stm32::pac::usart::vals::{Over8, Ps, Stop, M0};
use syslink_hal::{
    DataBits, DmaDirection, Parity, SerialPort, StopBits, UartConfig, UartInterrupt, UartStatus,
};

/// Alternate function of USART6 on PC6/PC7
const USART6_AF: u8 = 8;
const TX_PIN: usize = 6;
const RX_PIN: usize = 7;

/// USART6 on PC6/PC7
pub struct Usart6 {
    /// APB2 clock feeding the baud-rate generator
    pclk_hz: u32,
}

impl Usart6 {
    /// Take over USART6 and its pins
    ///
    /// `pclk_hz` is the APB2 frequency chosen at clock setup. The port is
    /// left disabled until [`SerialPort::set_enabled`].
    pub fn new(pclk_hz: u32) -> Self {
        pac::RCC.apb2enr().modify(|w| w.set_usart6en(true));
        pac::RCC.ahb1enr().modify(|w| w.set_gpiocen(true));

        for pin in [TX_PIN, RX_PIN] {
            pac::GPIOC.afr(pin / 8).modify(|w| w.set_afr(pin % 8, USART6_AF));
            pac::GPIOC.moder().modify(|w| w.set_moder(pin, Moder::ALTERNATE));
        }

        pac::USART6.cr1().modify(|w| w.set_ue(false));
        Self { pclk_hz }
    }

    /// Transmission complete with the TC interrupt armed
    ///
    /// This is how the end of a DMA transmit shows up on this chip.
    pub fn transmit_complete_pending() -> bool {
        pac::USART6.sr().read().tc() && pac::USART6.cr1().read().tcie()
    }

    /// Address of the data register, for the DMA streams
    pub(crate) fn data_register() -> u32 {
        pac::USART6.dr().as_ptr() as u32
    }
}

impl SerialPort for Usart6 {
    fn configure(&mut self, config: &UartConfig) {
        let parity = config.parity != Parity::None;
        // M counts the parity bit; seven data bits need parity to fit
        let word = match (config.data_bits, parity) {
            (DataBits::Nine, _) | (DataBits::Eight, true) => M0::BIT9,
            _ => M0::BIT8,
        };

        let r = pac::USART6;
        r.cr1().modify(|w| {
            w.set_m0(word);
            w.set_pce(parity);
            w.set_ps(if config.parity == Parity::Odd { Ps::ODD } else { Ps::EVEN });
            w.set_over8(Over8::OVERSAMPLING16);
            w.set_te(true);
            w.set_re(config.mode.receives());
        });
        r.cr2().modify(|w| {
            w.set_stop(match config.stop_bits {
                StopBits::One => Stop::STOP1,
                StopBits::Two => Stop::STOP2,
            })
        });
        // 16x oversampling: BRR = mantissa << 4 | fraction = pclk / baud
        let divisor = (self.pclk_hz + config.baudrate / 2) / config.baudrate;
        r.brr().write_value(pac::usart::regs::Brr(divisor));
    }

    fn set_enabled(&mut self, enabled: bool) {
        pac::USART6.cr1().modify(|w| w.set_ue(enabled));
    }

    fn status(&self) -> UartStatus {
        let sr = pac::USART6.sr().read();
        UartStatus {
            rx_not_empty: sr.rxne(),
            idle: sr.idle(),
            tx_empty: sr.txe(),
            overrun: sr.ore(),
            framing_error: sr.fe(),
            noise: sr.ne(),
            parity_error: sr.pe(),
        }
    }

    fn read_data(&mut self) -> u8 {
        pac::USART6.dr().read().dr() as u8
    }

    fn write_data(&mut self, byte: u8) {
        pac::USART6.dr().write(|w| w.set_dr(byte as u16));
    }

    fn set_interrupt(&mut self, irq: UartInterrupt, enabled: bool) {
        pac::USART6.cr1().modify(|w| match irq {
            UartInterrupt::RxNotEmpty => w.set_rxneie(enabled),
            UartInterrupt::Idle => w.set_idleie(enabled),
            UartInterrupt::TxEmpty => w.set_txeie(enabled),
        });
    }

    fn is_interrupt_enabled(&self, irq: UartInterrupt) -> bool {
        let cr1 = pac::USART6.cr1().read();
        match irq {
            UartInterrupt::RxNotEmpty => cr1.rxneie(),
            UartInterrupt::Idle => cr1.idleie(),
            UartInterrupt::TxEmpty => cr1.txeie(),
        }
    }

    fn set_dma_request(&mut self, direction: DmaDirection, enabled: bool) {
        pac::USART6.cr3().modify(|w| match direction {
            DmaDirection::Rx => w.set_dmar(enabled),
            DmaDirection::Tx => w.set_dmat(enabled),
        });
    }

    fn clear_transmit_complete(&mut self) {
        // TC is rc_w0
        pac::USART6.sr().modify(|w| w.set_tc(false));
    }
}
