//! Packet groups and packet type identifiers
//!
//! The high nibble of a packet's type byte names the subsystem that owns it;
//! the low nibble is the command within that subsystem.

/// Bits of the type byte that carry the group tag
pub const GROUP_MASK: u8 = 0xF0;

// Group tags (type & GROUP_MASK)
pub const RADIO_GROUP: u8 = 0x00;
pub const PM_GROUP: u8 = 0x10;
pub const OW_GROUP: u8 = 0x20;

// Radio group
pub const RADIO_RAW: u8 = 0x00;
pub const RADIO_CHANNEL: u8 = 0x01;
pub const RADIO_DATARATE: u8 = 0x02;
pub const RADIO_CONTWAVE: u8 = 0x03;
pub const RADIO_RSSI: u8 = 0x04;
pub const RADIO_ADDRESS: u8 = 0x05;

// Power management group
pub const PM_SOURCE: u8 = 0x10;
pub const PM_ONOFF_SWITCHOFF: u8 = 0x11;
pub const PM_BATTERY_VOLTAGE: u8 = 0x12;
pub const PM_BATTERY_STATE: u8 = 0x13;
pub const PM_BATTERY_AUTOUPDATE: u8 = 0x14;

// One-wire memory group
pub const OW_SCAN: u8 = 0x20;
pub const OW_GETINFO: u8 = 0x21;
pub const OW_READ: u8 = 0x22;
pub const OW_WRITE: u8 = 0x23;

/// Subsystem a packet is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketGroup {
    /// Radio link (raw radio payloads and radio settings)
    Radio,
    /// Power management (battery, charger, power switch)
    PowerManagement,
    /// One-wire memory store (expansion deck EEPROMs)
    OneWire,
}

impl PacketGroup {
    /// Classify a packet type byte
    ///
    /// Returns `None` for group tags no subsystem owns.
    pub fn from_type(packet_type: u8) -> Option<Self> {
        match packet_type & GROUP_MASK {
            RADIO_GROUP => Some(PacketGroup::Radio),
            PM_GROUP => Some(PacketGroup::PowerManagement),
            OW_GROUP => Some(PacketGroup::OneWire),
            _ => None,
        }
    }

    /// Group tag bits of this group
    pub fn tag(self) -> u8 {
        match self {
            PacketGroup::Radio => RADIO_GROUP,
            PacketGroup::PowerManagement => PM_GROUP,
            PacketGroup::OneWire => OW_GROUP,
        }
    }

    /// Returns true if `packet_type` belongs to this group
    pub fn contains(self, packet_type: u8) -> bool {
        packet_type & GROUP_MASK == self.tag()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_from_type() {
        assert_eq!(PacketGroup::from_type(RADIO_RAW), Some(PacketGroup::Radio));
        assert_eq!(PacketGroup::from_type(RADIO_ADDRESS), Some(PacketGroup::Radio));
        assert_eq!(
            PacketGroup::from_type(PM_BATTERY_STATE),
            Some(PacketGroup::PowerManagement)
        );
        assert_eq!(PacketGroup::from_type(OW_WRITE), Some(PacketGroup::OneWire));
    }

    #[test]
    fn test_unknown_group() {
        assert_eq!(PacketGroup::from_type(0x30), None);
        assert_eq!(PacketGroup::from_type(0xF5), None);
    }

    #[test]
    fn test_tag_roundtrip() {
        for group in [
            PacketGroup::Radio,
            PacketGroup::PowerManagement,
            PacketGroup::OneWire,
        ] {
            assert_eq!(PacketGroup::from_type(group.tag() | 0x0F), Some(group));
            assert!(group.contains(group.tag() | 0x03));
        }
        assert!(!PacketGroup::Radio.contains(PM_SOURCE));
    }
}
