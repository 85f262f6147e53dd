//! Intra-zone messaging: proactive advertisement control
//!
//! Lets the engine drive the proactive protocol's advertisement cycle on
//! demand instead of waiting for its own timers, and feeds inbound
//! advertisements to its receive path.

use crate::protocol::{MessageChannel, ProactiveProtocol};
use tracing::debug;

/// Run one advertisement cycle now: neighbor hello, then topology control
pub fn send_zone_advertisement<P>(proactive: &mut P)
where
    P: ProactiveProtocol + ?Sized,
{
    debug!("Triggering zone advertisement");
    proactive.hello_timer_expire();
    proactive.tc_timer_expire();
}

/// Read one message from `channel` and hand it to the proactive protocol
///
/// Returns false if the channel had nothing pending.
pub fn receive_zone_advertisement<P>(proactive: &mut P, channel: &mut dyn MessageChannel) -> bool
where
    P: ProactiveProtocol + ?Sized,
{
    match channel.recv_from() {
        Some((packet, sender)) => {
            debug!("Zone advertisement from {} ({} bytes)", sender, packet.len());
            proactive.receive(packet, sender);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Packet;
    use crate::testing::{FakeProactive, QueueChannel};
    use std::net::{Ipv4Addr, SocketAddrV4};

    #[test]
    fn test_advertisement_runs_hello_then_tc() {
        let mut proactive = FakeProactive::new();
        send_zone_advertisement(&mut proactive);
        send_zone_advertisement(&mut proactive);

        assert_eq!(proactive.hello_count(), 2);
        assert_eq!(proactive.tc_count(), 2);
    }

    #[test]
    fn test_receive_forwards_packet_and_sender() {
        let mut proactive = FakeProactive::new();
        let sender = SocketAddrV4::new(Ipv4Addr::new(10, 1, 1, 2), 698);
        let mut channel = QueueChannel::new(Some(1));
        channel.push(Packet::from_bytes(vec![1, 2, 3]), sender);

        assert!(receive_zone_advertisement(&mut proactive, &mut channel));
        assert_eq!(proactive.received(), &[(Packet::from_bytes(vec![1, 2, 3]), sender)]);
    }

    #[test]
    fn test_receive_reads_only_one_message() {
        let mut proactive = FakeProactive::new();
        let sender = SocketAddrV4::new(Ipv4Addr::new(10, 1, 1, 2), 698);
        let mut channel = QueueChannel::new(None);
        channel.push(Packet::from_bytes(vec![1]), sender);
        channel.push(Packet::from_bytes(vec![2]), sender);

        assert!(receive_zone_advertisement(&mut proactive, &mut channel));
        assert_eq!(proactive.received().len(), 1);
        assert_eq!(channel.pending(), 1);
    }

    #[test]
    fn test_receive_on_empty_channel() {
        let mut proactive = FakeProactive::new();
        let mut channel = QueueChannel::new(None);

        assert!(!receive_zone_advertisement(&mut proactive, &mut channel));
        assert!(proactive.received().is_empty());
    }
}
