//! Frame encoding and decoding for the syslink protocol.
//!
//! Frame format:
//! - START (2 bytes): 0xBC 0xCF synchronization sequence
//! - TYPE (1 byte): packet type (group tag in the high nibble)
//! - LENGTH (1 byte): data length (0-MTU)
//! - DATA (0-MTU bytes)
//! - CKSUM (2 bytes): two-stage running sum over TYPE, LENGTH and DATA

use heapless::Vec;

use crate::checksum::Checksum;
use crate::packet::{Packet, MTU};

/// First synchronization byte
pub const START_BYTE1: u8 = 0xBC;

/// Second synchronization byte
pub const START_BYTE2: u8 = 0xCF;

/// Bytes a frame adds around its data (START×2 + TYPE + LENGTH + CKSUM×2)
pub const FRAME_OVERHEAD: usize = 6;

/// Maximum complete frame size
pub const MAX_FRAME_SIZE: usize = MTU + FRAME_OVERHEAD;

/// Errors that can occur during frame parsing or encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Payload exceeds the MTU
    PayloadTooLarge,
    /// Length byte on the wire exceeds the MTU
    InvalidLength,
    /// Checksum mismatch
    InvalidChecksum,
    /// Buffer too small for encoding
    BufferTooSmall,
}

impl Packet {
    /// Encode this packet as a wire frame into `buffer`
    ///
    /// Returns the number of bytes written
    pub fn encode(&self, buffer: &mut [u8]) -> Result<usize, FrameError> {
        let data = self.data();
        let frame_len = FRAME_OVERHEAD + data.len();
        if buffer.len() < frame_len {
            return Err(FrameError::BufferTooSmall);
        }

        let mut checksum = Checksum::new();
        checksum.fold(self.packet_type());
        checksum.fold(self.length());
        checksum.fold_all(data);

        buffer[0] = START_BYTE1;
        buffer[1] = START_BYTE2;
        buffer[2] = self.packet_type();
        buffer[3] = self.length();
        buffer[4..4 + data.len()].copy_from_slice(data);
        buffer[4 + data.len()..frame_len].copy_from_slice(&checksum.to_bytes());

        Ok(frame_len)
    }

    /// Encode this packet as a wire frame into a heapless Vec
    pub fn to_frame(&self) -> Vec<u8, MAX_FRAME_SIZE> {
        let mut buffer = [0u8; MAX_FRAME_SIZE];
        // A packet never exceeds MTU, so a MAX_FRAME_SIZE buffer always fits
        let len = self.encode(&mut buffer).unwrap_or(0);
        let mut vec = Vec::new();
        let _ = vec.extend_from_slice(&buffer[..len]);
        vec
    }
}

/// Cheap structural check of a received burst
///
/// Accepts exactly one complete frame: both start bytes, a length within the
/// MTU that accounts for every byte of the burst, and matching checksums.
/// Used for receive diagnostics only; the [`FrameParser`] does the real work.
pub fn is_plausible_frame(bytes: &[u8]) -> bool {
    if bytes.len() < FRAME_OVERHEAD {
        return false;
    }
    if bytes[0] != START_BYTE1 || bytes[1] != START_BYTE2 {
        return false;
    }

    let length = bytes[3] as usize;
    if length > MTU || length + FRAME_OVERHEAD != bytes.len() {
        return false;
    }

    let checksum = Checksum::of(&bytes[2..4 + length]);
    checksum.to_bytes() == [bytes[4 + length], bytes[5 + length]]
}

/// Parser state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseState {
    /// Scanning for the first start byte
    WaitStart1,
    /// Got 0xBC, expecting 0xCF
    WaitStart2,
    /// Expecting the type byte
    WaitType,
    /// Expecting the length byte
    WaitLength,
    /// Collecting data bytes
    WaitData {
        /// Data bytes still to come
        remaining: u8,
    },
    /// Expecting the first checksum byte
    WaitChecksum1,
    /// Expecting the second checksum byte
    WaitChecksum2,
}

/// Resynchronizing state machine for parsing incoming frames
///
/// State is kept across calls, so bytes may arrive in any split.
#[derive(Debug, Clone)]
pub struct FrameParser {
    state: ParseState,
    packet_type: u8,
    data: Vec<u8, MTU>,
    checksum: Checksum,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    /// Create a new frame parser
    pub const fn new() -> Self {
        Self {
            state: ParseState::WaitStart1,
            packet_type: 0,
            data: Vec::new(),
            checksum: Checksum::new(),
        }
    }

    /// Current parser state
    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Drop any partial frame and scan for a start byte again
    pub fn reset(&mut self) {
        self.state = ParseState::WaitStart1;
        self.data.clear();
        self.checksum = Checksum::new();
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(packet))` when a complete valid frame is parsed,
    /// `Ok(None)` when more bytes are needed, or `Err` when a frame was
    /// rejected. After an error the parser is already back in
    /// [`ParseState::WaitStart1`].
    pub fn feed(&mut self, byte: u8) -> Result<Option<Packet>, FrameError> {
        match self.state {
            ParseState::WaitStart1 => {
                if byte == START_BYTE1 {
                    self.state = ParseState::WaitStart2;
                }
                Ok(None)
            }
            ParseState::WaitStart2 => {
                // A repeated 0xBC does not count as a fresh first start byte
                self.state = if byte == START_BYTE2 {
                    ParseState::WaitType
                } else {
                    ParseState::WaitStart1
                };
                Ok(None)
            }
            ParseState::WaitType => {
                self.packet_type = byte;
                self.data.clear();
                self.checksum = Checksum::new();
                self.checksum.fold(byte);
                self.state = ParseState::WaitLength;
                Ok(None)
            }
            ParseState::WaitLength => {
                if byte as usize > MTU {
                    self.reset();
                    return Err(FrameError::InvalidLength);
                }
                self.checksum.fold(byte);
                self.state = if byte > 0 {
                    ParseState::WaitData { remaining: byte }
                } else {
                    ParseState::WaitChecksum1
                };
                Ok(None)
            }
            ParseState::WaitData { remaining } => {
                // Cannot overflow: remaining was bounded by MTU
                let _ = self.data.push(byte);
                self.checksum.fold(byte);
                self.state = if remaining > 1 {
                    ParseState::WaitData {
                        remaining: remaining - 1,
                    }
                } else {
                    ParseState::WaitChecksum1
                };
                Ok(None)
            }
            ParseState::WaitChecksum1 => {
                if byte != self.checksum.sum0() {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }
                self.state = ParseState::WaitChecksum2;
                Ok(None)
            }
            ParseState::WaitChecksum2 => {
                let valid = byte == self.checksum.sum1();
                // Accepted or not, the next frame starts from scratch
                self.state = ParseState::WaitStart1;
                if !valid {
                    self.reset();
                    return Err(FrameError::InvalidChecksum);
                }

                let data = core::mem::take(&mut self.data);
                Ok(Some(Packet::from_parts(self.packet_type, data)))
            }
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Every byte is consumed; each complete packet is handed to `on_packet`
    /// in arrival order. Rejected frames are skipped. Returns the number of
    /// packets produced.
    pub fn feed_bytes(&mut self, bytes: &[u8], mut on_packet: impl FnMut(Packet)) -> usize {
        let mut count = 0;
        for &byte in bytes {
            if let Ok(Some(packet)) = self.feed(byte) {
                on_packet(packet);
                count += 1;
            }
        }
        count
    }
}
