//! Dispatch table of the firmware
//!
//! Each group handler only queues the packet for its subsystem task.

use defmt::*;
use syslink_core::DispatchTable;
use syslink_protocol::Packet;

use crate::channels::{PacketChannel, OW_RX, PM_RX, RADIO_RX};

type Handler = fn(&Packet);

pub type SyslinkDispatch = DispatchTable<Handler, Handler, Handler>;

pub fn dispatch_table() -> SyslinkDispatch {
    DispatchTable::new(
        forward_radio as Handler,
        forward_power as Handler,
        forward_one_wire as Handler,
    )
}

fn forward_radio(packet: &Packet) {
    forward(&RADIO_RX, "radio", packet);
}

fn forward_power(packet: &Packet) {
    forward(&PM_RX, "power", packet);
}

fn forward_one_wire(packet: &Packet) {
    forward(&OW_RX, "one-wire", packet);
}

fn forward<const N: usize>(channel: &PacketChannel<N>, name: &str, packet: &Packet) {
    if channel.try_send(packet.clone()).is_err() {
        warn!(
            "{=str} queue full, dropping packet {=u8:#x}",
            name,
            packet.packet_type()
        );
    }
}
