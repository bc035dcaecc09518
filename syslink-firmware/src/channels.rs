//! Inter-task communication channels
//!
//! The dispatch table runs inside the syslink receive task and must not
//! block, so each subsystem gets a bounded queue. A full queue drops the
//! packet.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use syslink_protocol::Packet;

/// Channel capacity for radio packets (the busiest group)
const RADIO_CHANNEL_SIZE: usize = 8;

/// Channel capacity for power-management packets
const PM_CHANNEL_SIZE: usize = 4;

/// Channel capacity for one-wire memory packets
const OW_CHANNEL_SIZE: usize = 2;

pub type PacketChannel<const N: usize> = Channel<CriticalSectionRawMutex, Packet, N>;

/// Radio link packets from the co-processor
pub static RADIO_RX: PacketChannel<RADIO_CHANNEL_SIZE> = Channel::new();

/// Power-management packets from the co-processor
pub static PM_RX: PacketChannel<PM_CHANNEL_SIZE> = Channel::new();

/// One-wire memory packets from the co-processor
pub static OW_RX: PacketChannel<OW_CHANNEL_SIZE> = Channel::new();
