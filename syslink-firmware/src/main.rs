//! Syslink firmware
//!
//! Application-MCU side of the link to the radio/power co-processor on an
//! STM32F405. Brings up USART6 with its DMA streams and flow-control line,
//! wires the interrupt vectors into the transport and runs the syslink
//! receive task plus one task per co-processor subsystem.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use syslink_core::Syslink;
use syslink_hal_stm32f4::{Dma2Stream, FlowControlPin, Usart6};
use syslink_protocol::MAX_FRAME_SIZE;
use syslink_transport::{LinkConfig, Peripherals, Transport};

mod channels;
mod handlers;
mod tasks;

/// Receive DMA buffer size
const RX_DMA_SIZE: usize = 256;

/// APB2 clock with the PLL setup below (168 MHz / 2)
const APB2_HZ: u32 = 84_000_000;

pub type LinkTransport =
    Transport<Usart6, Dma2Stream<RX_DMA_SIZE>, Dma2Stream<MAX_FRAME_SIZE>, FlowControlPin>;

/// The link to the co-processor, shared by the interrupt vectors and tasks
pub static TRANSPORT: LinkTransport = Transport::new();

/// Packet sender over [`TRANSPORT`]
pub static SYSLINK: Syslink<'static, LinkTransport> = Syslink::new(&TRANSPORT);

// DMA memory windows (must live forever)
static RX_BUF: StaticCell<[u8; RX_DMA_SIZE]> = StaticCell::new();
static TX_BUF: StaticCell<[u8; MAX_FRAME_SIZE]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Syslink firmware starting...");

    let p = embassy_stm32::init(clock_config());
    info!("Peripherals initialized");

    let hw = Peripherals {
        port: Usart6::new(APB2_HZ),
        rx_dma: Dma2Stream::usart6_rx(RX_BUF.init([0; RX_DMA_SIZE])),
        tx_dma: Dma2Stream::usart6_tx(TX_BUF.init([0; MAX_FRAME_SIZE])),
        flow_control: FlowControlPin::new(p.PA4),
    };

    // The receive task consumes the DMA path; the byte queue stays off
    let config = LinkConfig {
        byte_interrupts: false,
        ..LinkConfig::default()
    };
    unwrap!(TRANSPORT.initialize(hw, config));

    interrupt::USART6.set_priority(Priority::P5);
    interrupt::EXTI4.set_priority(Priority::P5);
    // SAFETY: the handlers below only touch TRANSPORT, which is initialized
    unsafe {
        interrupt::USART6.enable();
        interrupt::EXTI4.enable();
    }
    info!("Syslink transport ready");

    spawner.spawn(tasks::syslink_rx_task()).unwrap();
    spawner.spawn(tasks::radio_task()).unwrap();
    spawner.spawn(tasks::power_task()).unwrap();
    spawner.spawn(tasks::one_wire_task()).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        if let Ok(stats) = TRANSPORT.stats() {
            debug!("Link stats: {}", stats);
        }
    }
}

/// 8 MHz HSE, 168 MHz system clock, APB2 at 84 MHz
fn clock_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;
    use embassy_stm32::time::Hertz;

    let mut config = embassy_stm32::Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(8_000_000),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll_src = PllSource::HSE;
    config.rcc.pll = Some(Pll {
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL168,
        divp: Some(PllPDiv::DIV2),
        divq: Some(PllQDiv::DIV7),
        divr: None,
    });
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV4;
    config.rcc.apb2_pre = APBPrescaler::DIV2;
    config.rcc.sys = Sysclk::PLL1_P;
    config
}

/// USART6: transmit completion (end of a DMA transmit), then RX/idle/TXE/errors
#[interrupt]
fn USART6() {
    if Usart6::transmit_complete_pending() {
        TRANSPORT.on_tx_dma_complete();
    } else {
        TRANSPORT.on_uart_interrupt();
    }
}

/// Flow-control line from the co-processor
#[interrupt]
fn EXTI4() {
    TRANSPORT.on_flow_control_edge();
}
