//! Syslink packet value type

use heapless::Vec;

use crate::frame::FrameError;
use crate::group::PacketGroup;

/// Maximum payload length of a syslink packet
pub const MTU: usize = 64;

/// A syslink packet: type byte plus up to [`MTU`] bytes of data
///
/// The length is the length of `data`, so `length <= MTU` holds for every
/// value of this type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Packet {
    packet_type: u8,
    data: Vec<u8, MTU>,
}

impl Packet {
    /// Create a packet with the given type and data
    pub fn new(packet_type: u8, data: &[u8]) -> Result<Self, FrameError> {
        if data.len() > MTU {
            return Err(FrameError::PayloadTooLarge);
        }

        let mut vec = Vec::new();
        vec.extend_from_slice(data)
            .map_err(|_| FrameError::PayloadTooLarge)?;

        Ok(Self {
            packet_type,
            data: vec,
        })
    }

    /// Create a packet with no data
    pub fn empty(packet_type: u8) -> Self {
        Self {
            packet_type,
            data: Vec::new(),
        }
    }

    pub(crate) fn from_parts(packet_type: u8, data: Vec<u8, MTU>) -> Self {
        Self { packet_type, data }
    }

    /// Type byte (group tag in the high nibble, command in the low nibble)
    pub fn packet_type(&self) -> u8 {
        self.packet_type
    }

    /// Number of data bytes
    pub fn length(&self) -> u8 {
        // MTU < 256, so this never truncates
        self.data.len() as u8
    }

    /// Data bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Subsystem this packet is routed to, if any
    pub fn group(&self) -> Option<PacketGroup> {
        PacketGroup::from_type(self.packet_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{OW_READ, PM_BATTERY_VOLTAGE, RADIO_RAW};

    #[test]
    fn test_new_packet() {
        let packet = Packet::new(RADIO_RAW, &[1, 2, 3]).unwrap();
        assert_eq!(packet.packet_type(), RADIO_RAW);
        assert_eq!(packet.length(), 3);
        assert_eq!(packet.data(), &[1, 2, 3]);
        assert_eq!(packet.group(), Some(PacketGroup::Radio));
    }

    #[test]
    fn test_empty_packet() {
        let packet = Packet::empty(OW_READ);
        assert_eq!(packet.length(), 0);
        assert!(packet.data().is_empty());
        assert_eq!(packet.group(), Some(PacketGroup::OneWire));
    }

    #[test]
    fn test_full_mtu_accepted() {
        let data = [0x5Au8; MTU];
        let packet = Packet::new(PM_BATTERY_VOLTAGE, &data).unwrap();
        assert_eq!(packet.length() as usize, MTU);
    }

    #[test]
    fn test_payload_too_large() {
        let data = [0u8; MTU + 1];
        assert_eq!(
            Packet::new(RADIO_RAW, &data),
            Err(FrameError::PayloadTooLarge)
        );
    }
}
