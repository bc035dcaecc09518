//! Radio link task

use defmt::*;
use syslink_protocol::group::{RADIO_RAW, RADIO_RSSI};

use crate::channels::RADIO_RX;

#[embassy_executor::task]
pub async fn radio_task() {
    info!("Radio task started");

    let mut received: u32 = 0;
    loop {
        let packet = RADIO_RX.receive().await;
        match packet.packet_type() {
            RADIO_RAW => {
                received = received.wrapping_add(1);
                trace!("Radio payload #{}: {=[u8]}", received, packet.data());
            }
            RADIO_RSSI => {
                if let Some(&rssi) = packet.data().first() {
                    trace!("RSSI -{}dBm", rssi);
                }
            }
            other => debug!("Radio packet {=u8:#x}, {} bytes", other, packet.length()),
        }
    }
}
