//! STM32F4 implementation of the syslink HAL traits
//!
//! Binds the link to the peripherals the STM32F405 uses for it:
//!
//! - USART6 on PC6 (TX) / PC7 (RX), alternate function 8
//! - DMA2 stream 1 channel 5 (USART6_RX) and stream 7 channel 5 (USART6_TX)
//! - PA4 as the flow-control input on EXTI line 4
//!
//! # Features
//!
//! - `stm32f405rg` - Enable support for the STM32F405RG
//! - `defmt` - Enable debug formatting support
//!
//! # Interrupts
//!
//! embassy-stm32 owns the DMA interrupt vectors, so transmit completion is
//! reported through the USART transmission-complete interrupt instead: the
//! transmit stream's completion interrupt enables USART6 TCIE. The receive
//! stream has no completion interrupt; a full buffer is picked up by the
//! idle-line interrupt that follows the burst. The firmware's USART6 handler
//! checks [`Usart6::transmit_complete_pending`] first.
//!
//! Nothing here uses embassy-stm32's USART, DMA or EXTI drivers, and the
//! `exti` feature must stay off so EXTI4 is free.

#![no_std]
#![deny(unsafe_code)]

pub mod dma;
pub mod gpio;
pub mod uart;

pub use dma::Dma2Stream;
pub use gpio::FlowControlPin;
pub use uart::Usart6;
