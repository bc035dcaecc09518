//! One-wire memory task
//!
//! Asks the co-processor to scan the one-wire bus and reports what it
//! found (expansion decks carry their identity in one-wire memories).

use defmt::*;
use syslink_protocol::group::{OW_GETINFO, OW_SCAN};
use syslink_protocol::Packet;

use crate::channels::OW_RX;
use crate::SYSLINK;

#[embassy_executor::task]
pub async fn one_wire_task() {
    info!("One-wire task started");

    if let Err(e) = SYSLINK.send(&Packet::empty(OW_SCAN)).await {
        warn!("One-wire scan request failed: {:?}", e);
        return;
    }

    loop {
        let packet = OW_RX.receive().await;
        match packet.packet_type() {
            OW_SCAN => {
                let count = packet.data().first().copied().unwrap_or(0);
                info!("One-wire scan: {} memories", count);
                for index in 0..count {
                    let request = match Packet::new(OW_GETINFO, &[index]) {
                        Ok(request) => request,
                        Err(_) => break,
                    };
                    if let Err(e) = SYSLINK.send(&request).await {
                        warn!("One-wire info request failed: {:?}", e);
                    }
                }
            }
            OW_GETINFO => debug!("One-wire memory info: {=[u8]}", packet.data()),
            other => debug!("One-wire packet {=u8:#x}", other),
        }
    }
}
