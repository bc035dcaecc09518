//! Receive pump
//!
//! The single consumer of the transport's receive path. Each cycle it drains
//! what the link has staged, runs every byte through the frame parser in
//! arrival order and dispatches each accepted packet. Rejected frames are
//! counted and skipped; the parser has already resynchronized.

use embassy_time::{Duration, Ticker};
use syslink_protocol::{FrameError, FrameParser, ParseState};
use syslink_transport::{Link, TransportError};

use crate::dispatch::PacketHandler;

/// Bytes pulled from the link per cycle
pub const PUMP_BUFFER_SIZE: usize = 200;

/// Default poll period
pub const DEFAULT_POLL_PERIOD_MS: u32 = 1;

/// Receive pump configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ReceiverConfig {
    /// Time between polls of the link
    pub poll_period_ms: u32,
}

impl ReceiverConfig {
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_period_ms as u64)
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            poll_period_ms: DEFAULT_POLL_PERIOD_MS,
        }
    }
}

/// Parser outcome counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiverStats {
    /// Packets accepted and dispatched
    pub packets: u32,
    /// Frames dropped on a checksum mismatch
    pub checksum_errors: u32,
    /// Frames dropped on a length above the MTU
    pub length_errors: u32,
}

/// Periodic syslink receive task state
pub struct Receiver {
    parser: FrameParser,
    stats: ReceiverStats,
    config: ReceiverConfig,
}

impl Receiver {
    pub const fn new(config: ReceiverConfig) -> Self {
        Self {
            parser: FrameParser::new(),
            stats: ReceiverStats {
                packets: 0,
                checksum_errors: 0,
                length_errors: 0,
            },
            config,
        }
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// State of the frame parser between cycles
    pub fn parse_state(&self) -> ParseState {
        self.parser.state()
    }

    /// Run one polling cycle
    ///
    /// Pulls up to [`PUMP_BUFFER_SIZE`] bytes from `link`, feeds all of them
    /// to the parser and hands each accepted packet to `handler`. Returns
    /// the number of packets dispatched.
    pub fn poll_once<L: Link, H: PacketHandler>(
        &mut self,
        link: &L,
        handler: &mut H,
    ) -> Result<usize, TransportError> {
        let mut buffer = [0u8; PUMP_BUFFER_SIZE];
        let count = link.get_available_data(&mut buffer)?;

        let mut packets = 0;
        for &byte in &buffer[..count] {
            match self.parser.feed(byte) {
                Ok(Some(packet)) => {
                    self.stats.packets = self.stats.packets.wrapping_add(1);
                    packets += 1;
                    handler.handle(&packet);
                }
                Ok(None) => {}
                Err(FrameError::InvalidChecksum) => {
                    self.stats.checksum_errors = self.stats.checksum_errors.wrapping_add(1);
                    trace!("syslink frame dropped: checksum");
                }
                Err(FrameError::InvalidLength) => {
                    self.stats.length_errors = self.stats.length_errors.wrapping_add(1);
                    trace!("syslink frame dropped: length");
                }
                Err(_) => {}
            }
        }
        Ok(packets)
    }

    /// Poll `link` forever at the configured period
    pub async fn run<L: Link, H: PacketHandler>(&mut self, link: &L, handler: &mut H) -> ! {
        let mut ticker = Ticker::every(self.config.poll_period());
        loop {
            if let Err(e) = self.poll_once(link, handler) {
                debug!("syslink poll failed: {}", e);
            }
            ticker.next().await;
        }
    }
}

impl Default for Receiver {
    fn default() -> Self {
        Self::new(ReceiverConfig::default())
    }
}
