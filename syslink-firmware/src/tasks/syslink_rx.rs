//! Syslink receive task
//!
//! Polls the transport every millisecond, parses frames and hands packets
//! to the dispatch table.

use defmt::*;
use syslink_core::{Receiver, ReceiverConfig};

use crate::handlers::dispatch_table;
use crate::TRANSPORT;

#[embassy_executor::task]
pub async fn syslink_rx_task() -> ! {
    info!("Syslink RX task started");

    let mut receiver = Receiver::new(ReceiverConfig::default());
    let mut table = dispatch_table();
    receiver.run(&TRANSPORT, &mut table).await
}
