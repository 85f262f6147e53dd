//! Routing protocol contracts
//!
//! [`RoutingProtocol`] is the fixed set of hooks a host IPv4 stack calls on
//! whatever routing protocol is installed: output routing, input routing,
//! interface/address notifications, context attachment and table printing.
//! The zone router implements it, and both of its delegates share the same
//! shape so a call can be handed down unchanged.
//!
//! Input routing reports its outcome through a [`ForwardHandler`]: exactly one
//! of unicast-forward, multicast-forward, local-deliver or error is expected
//! to fire when the protocol claims the packet.

use crate::context::NetworkContext;
use crate::error::RoutingError;
use crate::net::{
    InterfaceAddress, InterfaceIndex, Ipv4Header, MulticastRoute, Packet, Route, TimeUnit,
};
use serde::{Deserialize, Serialize};
use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use tracing::trace;

// ============================================================================
// FORWARDING CALLBACKS
// ============================================================================

/// The four forwarding outcomes of input routing
pub trait ForwardHandler {
    /// Forward the packet one hop along `route`
    fn unicast_forward(&mut self, route: Route, packet: &Packet, header: &Ipv4Header);

    /// Replicate the packet along a multicast route
    fn multicast_forward(&mut self, route: MulticastRoute, packet: &Packet, header: &Ipv4Header);

    /// Hand the packet up the stack on `interface`
    fn local_deliver(&mut self, packet: &Packet, header: &Ipv4Header, interface: InterfaceIndex);

    /// The packet cannot be routed; the caller drops it
    fn error(&mut self, packet: &Packet, header: &Ipv4Header, err: RoutingError);
}

/// Discards every outcome
///
/// Used for diagnostic intake where nothing is wired to forward or deliver.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullForwardHandler;

impl ForwardHandler for NullForwardHandler {
    fn unicast_forward(&mut self, route: Route, _packet: &Packet, header: &Ipv4Header) {
        trace!("Discarding unicast forward to {} ({})", header.destination, route);
    }

    fn multicast_forward(&mut self, route: MulticastRoute, _packet: &Packet, _header: &Ipv4Header) {
        trace!("Discarding multicast forward for group {}", route.group);
    }

    fn local_deliver(&mut self, _packet: &Packet, header: &Ipv4Header, interface: InterfaceIndex) {
        trace!("Discarding local delivery from {} on {}", header.source, interface);
    }

    fn error(&mut self, _packet: &Packet, header: &Ipv4Header, err: RoutingError) {
        trace!("Discarding routing error for {}: {}", header.destination, err);
    }
}

/// A forwarding outcome captured by [`ForwardActions`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForwardAction {
    Unicast(Route),
    Multicast(MulticastRoute),
    LocalDeliver(InterfaceIndex),
    Error(RoutingError),
}

/// Collects outcomes so they can be acted on after the routing call returns
///
/// Used where the caller cannot lend a handler into the call, such as across
/// a task boundary.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ForwardActions {
    pub actions: Vec<ForwardAction>,
}

impl ForwardActions {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ForwardHandler for ForwardActions {
    fn unicast_forward(&mut self, route: Route, _packet: &Packet, _header: &Ipv4Header) {
        self.actions.push(ForwardAction::Unicast(route));
    }

    fn multicast_forward(&mut self, route: MulticastRoute, _packet: &Packet, _header: &Ipv4Header) {
        self.actions.push(ForwardAction::Multicast(route));
    }

    fn local_deliver(&mut self, _packet: &Packet, _header: &Ipv4Header, interface: InterfaceIndex) {
        self.actions.push(ForwardAction::LocalDeliver(interface));
    }

    fn error(&mut self, _packet: &Packet, _header: &Ipv4Header, err: RoutingError) {
        self.actions.push(ForwardAction::Error(err));
    }
}

// ============================================================================
// PROTOCOL CONTRACTS
// ============================================================================

/// Hooks a host stack calls on an installed routing protocol
pub trait RoutingProtocol {
    /// Attach the node's network layer
    fn set_network_context(&mut self, context: Arc<dyn NetworkContext>);

    /// Pick a route for a locally originated packet
    fn route_output(
        &mut self,
        packet: &Packet,
        header: &Ipv4Header,
        output_interface: Option<InterfaceIndex>,
    ) -> Result<Route, RoutingError>;

    /// Decide what to do with a received packet. Returns true if handled.
    fn route_input(
        &mut self,
        packet: &Packet,
        header: &Ipv4Header,
        input_interface: Option<InterfaceIndex>,
        handler: &mut dyn ForwardHandler,
    ) -> bool;

    fn notify_interface_up(&mut self, _interface: InterfaceIndex) {}

    fn notify_interface_down(&mut self, _interface: InterfaceIndex) {}

    fn notify_address_added(&mut self, _interface: InterfaceIndex, _address: InterfaceAddress) {}

    fn notify_address_removed(&mut self, _interface: InterfaceIndex, _address: InterfaceAddress) {}

    /// Dump the protocol's routing table
    fn print_routing_table(&self, _sink: &mut dyn io::Write, _unit: TimeUnit) -> io::Result<()> {
        Ok(())
    }
}

/// A destination known to the proactive protocol and its hop distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyEntry {
    pub destination: Ipv4Addr,
    pub distance: u32,
}

/// Periodically advertising, table-driven protocol used inside the zone
pub trait ProactiveProtocol: RoutingProtocol {
    /// Emit a neighbor hello now
    fn hello_timer_expire(&mut self);

    /// Emit a topology-control advertisement now
    fn tc_timer_expire(&mut self);

    /// Process one inbound control message
    fn receive(&mut self, packet: Packet, sender: SocketAddrV4);

    /// Current destinations with their hop distances
    fn topology_entries(&self) -> Vec<TopologyEntry>;
}

/// On-demand discovery protocol used beyond the zone
pub trait ReactiveProtocol: RoutingProtocol {}

// ============================================================================
// CONTROL CHANNELS
// ============================================================================

/// Source of inbound control messages (a bound socket in a real stack)
pub trait MessageChannel {
    /// Take the next pending message and its sender, if any
    fn recv_from(&mut self) -> Option<(Packet, SocketAddrV4)>;

    /// Interface the channel is bound to, if any
    fn bound_interface(&self) -> Option<InterfaceIndex>;
}
