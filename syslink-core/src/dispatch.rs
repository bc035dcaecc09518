//! Dispatch table
//!
//! Routes each accepted packet to the subsystem named by its group tag. The
//! table itself holds no state; handlers are called synchronously from the
//! receive pump and must not block.

use syslink_protocol::{Packet, PacketGroup};

/// Consumer of received packets
pub trait PacketHandler {
    /// Handle one packet
    fn handle(&mut self, packet: &Packet);
}

impl<F: FnMut(&Packet)> PacketHandler for F {
    fn handle(&mut self, packet: &Packet) {
        self(packet)
    }
}

/// One handler per packet group
pub struct DispatchTable<R, P, O> {
    /// Radio link packets
    pub radio: R,
    /// Power management packets
    pub power: P,
    /// One-wire memory packets
    pub one_wire: O,
}

impl<R, P, O> DispatchTable<R, P, O>
where
    R: PacketHandler,
    P: PacketHandler,
    O: PacketHandler,
{
    pub const fn new(radio: R, power: P, one_wire: O) -> Self {
        Self {
            radio,
            power,
            one_wire,
        }
    }

    /// Route `packet` to its group's handler
    ///
    /// Returns the group it went to, or `None` if the type carries no known
    /// group tag; such packets are logged and dropped.
    pub fn dispatch(&mut self, packet: &Packet) -> Option<PacketGroup> {
        let group = packet.group();
        match group {
            Some(PacketGroup::Radio) => self.radio.handle(packet),
            Some(PacketGroup::PowerManagement) => self.power.handle(packet),
            Some(PacketGroup::OneWire) => self.one_wire.handle(packet),
            None => warn!(
                "dropping syslink packet with unknown type {=u8:#x}",
                packet.packet_type()
            ),
        }
        group
    }
}

impl<R, P, O> PacketHandler for DispatchTable<R, P, O>
where
    R: PacketHandler,
    P: PacketHandler,
    O: PacketHandler,
{
    fn handle(&mut self, packet: &Packet) {
        self.dispatch(packet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;
    use syslink_protocol::group::{OW_READ, PM_BATTERY_STATE, RADIO_CHANNEL, RADIO_RAW};

    #[test]
    fn test_routes_by_group() {
        let mut radio = Vec::new();
        let mut power = Vec::new();
        let mut one_wire = Vec::new();

        {
            let mut table = DispatchTable::new(
                |p: &Packet| radio.push(p.packet_type()),
                |p: &Packet| power.push(p.packet_type()),
                |p: &Packet| one_wire.push(p.packet_type()),
            );

            assert_eq!(
                table.dispatch(&Packet::empty(RADIO_RAW)),
                Some(PacketGroup::Radio)
            );
            assert_eq!(
                table.dispatch(&Packet::empty(RADIO_CHANNEL)),
                Some(PacketGroup::Radio)
            );
            assert_eq!(
                table.dispatch(&Packet::empty(PM_BATTERY_STATE)),
                Some(PacketGroup::PowerManagement)
            );
            assert_eq!(
                table.dispatch(&Packet::empty(OW_READ)),
                Some(PacketGroup::OneWire)
            );
        }

        assert_eq!(radio, [RADIO_RAW, RADIO_CHANNEL]);
        assert_eq!(power, [PM_BATTERY_STATE]);
        assert_eq!(one_wire, [OW_READ]);
    }

    #[test]
    fn test_unknown_group_is_dropped() {
        let mut calls = 0;
        {
            let mut table = DispatchTable::new(
                |_: &Packet| calls += 1,
                |_: &Packet| {},
                |_: &Packet| {},
            );
            for packet_type in [0x30, 0x7F, 0xF0] {
                assert_eq!(table.dispatch(&Packet::empty(packet_type)), None);
            }
        }
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_table_is_a_handler() {
        let mut seen = Vec::new();
        {
            let mut table = DispatchTable::new(
                |p: &Packet| seen.push(p.data().to_vec()),
                |_: &Packet| {},
                |_: &Packet| {},
            );
            let handler: &mut dyn PacketHandler = &mut table;
            handler.handle(&Packet::new(RADIO_RAW, &[7, 8]).unwrap());
        }
        assert_eq!(seen, [std::vec![7, 8]]);
    }
}
