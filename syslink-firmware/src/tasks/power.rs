//! Power management task
//!
//! Turns on battery auto-update on the co-processor and tracks what it
//! reports.

use defmt::*;
use syslink_protocol::group::{
    PM_BATTERY_AUTOUPDATE, PM_BATTERY_STATE, PM_BATTERY_VOLTAGE, PM_ONOFF_SWITCHOFF, PM_SOURCE,
};
use syslink_protocol::Packet;

use crate::channels::PM_RX;
use crate::SYSLINK;

/// Battery state flag: charging
const FLAG_CHARGING: u8 = 0x01;
/// Battery state flag: charger connected
const FLAG_CHARGER_CONNECTED: u8 = 0x02;

/// Battery state as reported by the co-processor
#[derive(Debug, Clone, Copy, PartialEq, Format)]
struct BatteryState {
    flags: u8,
    voltage: f32,
}

impl BatteryState {
    /// Parse `flags:u8, vbat:f32le, ...`
    fn parse(data: &[u8]) -> Option<Self> {
        let flags = *data.first()?;
        let voltage = read_f32(data, 1)?;
        Some(Self { flags, voltage })
    }
}

fn read_f32(data: &[u8], offset: usize) -> Option<f32> {
    let bytes = data.get(offset..offset + 4)?;
    Some(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

#[embassy_executor::task]
pub async fn power_task() {
    info!("Power task started");

    if let Err(e) = SYSLINK.send(&Packet::empty(PM_BATTERY_AUTOUPDATE)).await {
        warn!("Failed to enable battery auto-update: {:?}", e);
    }

    let mut last: Option<BatteryState> = None;
    loop {
        let packet = PM_RX.receive().await;
        match packet.packet_type() {
            PM_BATTERY_STATE => match BatteryState::parse(packet.data()) {
                Some(state) => {
                    if last.map(|s| s.flags) != Some(state.flags) {
                        info!(
                            "Battery: {}V charging={} charger={}",
                            state.voltage,
                            state.flags & FLAG_CHARGING != 0,
                            state.flags & FLAG_CHARGER_CONNECTED != 0
                        );
                    }
                    last = Some(state);
                }
                None => warn!("Short battery state packet ({} bytes)", packet.length()),
            },
            PM_BATTERY_VOLTAGE => {
                if let Some(voltage) = read_f32(packet.data(), 0) {
                    debug!("Battery voltage {}V", voltage);
                }
            }
            PM_ONOFF_SWITCHOFF => warn!("Co-processor requested switch-off"),
            PM_SOURCE => debug!("Power source packet: {=[u8]}", packet.data()),
            other => debug!("Unhandled power packet {=u8:#x}", other),
        }
    }
}
