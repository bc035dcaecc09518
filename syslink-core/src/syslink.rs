//! Serializer/sender

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex;
use syslink_protocol::{Packet, MTU};
use syslink_transport::{Link, TransportError};

/// Sending side of the syslink
///
/// Every caller goes through one lock that is held until the frame is fully
/// on the wire, so frames from different tasks never interleave. Which
/// waiting caller goes next is not specified.
pub struct Syslink<'a, L> {
    link: &'a L,
    access: Mutex<CriticalSectionRawMutex, ()>,
}

impl<'a, L> Syslink<'a, L> {
    /// Create a sender over `link`
    pub const fn new(link: &'a L) -> Self {
        Self {
            link,
            access: Mutex::new(()),
        }
    }
}

impl<'a, L: Link> Syslink<'a, L> {
    /// Check whether the underlying link is up
    pub fn is_ready(&self) -> bool {
        self.link.is_ready()
    }

    /// Frame `packet` and send it
    ///
    /// Returns once the last checksum byte has been transmitted.
    ///
    /// # Panics
    ///
    /// If the packet carries more than [`MTU`] data bytes.
    pub async fn send(&self, packet: &Packet) -> Result<(), TransportError> {
        assert!(
            packet.length() as usize <= MTU,
            "syslink packet exceeds MTU"
        );

        let _access = self.access.lock().await;
        let frame = packet.to_frame();
        self.link.send_dma_blocking(&frame).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLink;
    use embassy_futures::block_on;
    use embassy_futures::join::join;
    use syslink_protocol::group::{PM_BATTERY_VOLTAGE, RADIO_RAW, RADIO_RSSI};

    #[test]
    fn test_send_frame_layout() {
        let link = MockLink::new();
        let syslink = Syslink::new(&link);
        let packet = Packet::new(0x01, &[0xAA, 0xBB]).unwrap();

        block_on(syslink.send(&packet)).unwrap();

        let (mut c0, mut c1) = (0u8, 0u8);
        for byte in [0x01u8, 0x02, 0xAA, 0xBB] {
            c0 = c0.wrapping_add(byte);
            c1 = c1.wrapping_add(c0);
        }
        assert_eq!(
            *link.wire.borrow(),
            [0xBC, 0xCF, 0x01, 0x02, 0xAA, 0xBB, c0, c1]
        );
    }

    #[test]
    fn test_send_empty_packet() {
        let link = MockLink::new();
        let syslink = Syslink::new(&link);

        block_on(syslink.send(&Packet::empty(RADIO_RSSI))).unwrap();

        let wire = link.wire.borrow();
        assert_eq!(wire.len(), 6);
        assert_eq!(wire[3], 0);
        assert_eq!(wire[4], RADIO_RSSI);
    }

    #[test]
    fn test_concurrent_sends_are_not_interleaved() {
        let link = MockLink::new();
        let syslink = Syslink::new(&link);
        let first = Packet::new(RADIO_RAW, &[0x11; 16]).unwrap();
        let second = Packet::new(PM_BATTERY_VOLTAGE, &[0x22; 4]).unwrap();

        let (a, b) = block_on(join(syslink.send(&first), syslink.send(&second)));
        assert_eq!(a, Ok(()));
        assert_eq!(b, Ok(()));

        let first_frame = first.to_frame();
        let second_frame = second.to_frame();
        let wire = link.wire.borrow();
        let (head, tail) = wire.split_at(first_frame.len());
        if head == &first_frame[..] {
            assert_eq!(tail, &second_frame[..]);
        } else {
            let (head, tail) = wire.split_at(second_frame.len());
            assert_eq!(head, &second_frame[..]);
            assert_eq!(tail, &first_frame[..]);
        }
    }

    #[test]
    fn test_send_on_link_down() {
        let link = MockLink::new();
        link.ready.set(false);
        let syslink = Syslink::new(&link);

        assert!(!syslink.is_ready());
        assert_eq!(
            block_on(syslink.send(&Packet::empty(RADIO_RAW))),
            Err(TransportError::NotReady)
        );
        assert!(link.wire.borrow().is_empty());
    }
}
