//! Inter-zone messaging: reactive route discovery
//!
//! Originates route requests on the reactive protocol's behalf and feeds
//! inbound on-demand messages to it. Request ids and origin sequence numbers
//! are per-engine counters: they start at 0, advance by one per request and
//! are never reset, so no two requests from one engine share either value
//! until the 32-bit space wraps.

use crate::context::NetworkContext;
use crate::error::RoutingError;
use crate::message::RouteRequestHeader;
use crate::net::{Ipv4Header, Packet};
use crate::protocol::{MessageChannel, NullForwardHandler, ReactiveProtocol};
use std::net::Ipv4Addr;
use tracing::{debug, warn};

/// Destination sequence number meaning "unknown"
pub const UNKNOWN_DESTINATION_SEQNO: u32 = 1;

/// Request counters for discovery originated by this engine
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InterZoneMessaging {
    next_request_id: u32,
    next_origin_seqno: u32,
}

impl InterZoneMessaging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next request will carry
    pub fn next_request_id(&self) -> u32 {
        self.next_request_id
    }

    /// Origin sequence number the next request will carry
    pub fn next_origin_seqno(&self) -> u32 {
        self.next_origin_seqno
    }

    /// Build the next request and advance both counters
    pub fn build_request(&mut self, destination: Ipv4Addr, origin: Ipv4Addr) -> RouteRequestHeader {
        let header = RouteRequestHeader {
            hop_count: 1,
            request_id: self.next_request_id,
            destination,
            destination_seqno: UNKNOWN_DESTINATION_SEQNO,
            origin,
            origin_seqno: self.next_origin_seqno,
            ..Default::default()
        };
        self.next_request_id = self.next_request_id.wrapping_add(1);
        self.next_origin_seqno = self.next_origin_seqno.wrapping_add(1);
        header
    }

    /// Originate a discovery request toward `destination` through the reactive protocol
    ///
    /// The request is submitted to the reactive protocol's output routing with
    /// a header carrying only the destination. Submission is fire-and-forget:
    /// a delegate failure is logged and the built request is still returned.
    /// Counters advance only once an origin address is known.
    pub fn originate<R>(
        &mut self,
        reactive: &mut R,
        context: &dyn NetworkContext,
        destination: Ipv4Addr,
    ) -> Result<RouteRequestHeader, RoutingError>
    where
        R: ReactiveProtocol + ?Sized,
    {
        let origin = context.primary_address().ok_or(RoutingError::NoPrimaryAddress)?;
        let request = self.build_request(destination, origin);

        let mut packet = Packet::new();
        packet.add_header(&request.encode());

        match reactive.route_output(&packet, &Ipv4Header::to(destination), None) {
            Ok(route) => debug!(
                "RREQ {} for {} submitted ({})",
                request.request_id, destination, route
            ),
            Err(e) => warn!(
                "RREQ {} for {} not routed by reactive protocol: {}",
                request.request_id, destination, e
            ),
        }

        Ok(request)
    }
}

/// Read one on-demand message and hand it to the reactive protocol's input routing
///
/// Forwarding outcomes are discarded. Returns whether the reactive protocol
/// handled the message; false as well when the channel was empty.
pub fn receive_on_demand_message<R>(reactive: &mut R, channel: &mut dyn MessageChannel) -> bool
where
    R: ReactiveProtocol + ?Sized,
{
    let Some((packet, sender)) = channel.recv_from() else {
        return false;
    };
    debug!("On-demand message from {} ({} bytes)", sender, packet.len());

    reactive.route_input(
        &packet,
        &Ipv4Header::default(),
        channel.bound_interface(),
        &mut NullForwardHandler,
    )
}
