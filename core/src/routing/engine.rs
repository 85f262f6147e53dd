//! Zone Routing Decision Engine: Proactive/Reactive Composition
//!
//! Splits the network around this node into a zone (destinations within the
//! configured hop radius) and everything beyond it. Each routing call is
//! handed whole to exactly one delegate:
//!
//! 1. **Distance**: look the destination up in the proactive protocol's
//!    topology table; unknown destinations get `radius + 1`
//! 2. **Intra-zone** (`distance <= radius`): the proactive protocol routes it
//! 3. **Inter-zone** (otherwise): the reactive protocol routes it
//!
//! The chosen delegate's answer is final. There is no retry and no fallback
//! to the other delegate when it fails.
//!
//! The engine also keeps a cache of its locally attached networks, rebuilt on
//! every interface or address change. The cache is what the routing table
//! dump prints; forwarding decisions never read it.

use super::cache::RouteCache;
use super::distance::{distance_to, is_within_zone};
use super::inter::{receive_on_demand_message, InterZoneMessaging};
use super::intra::{receive_zone_advertisement, send_zone_advertisement};
use crate::config::ZoneConfig;
use crate::context::NetworkContext;
use crate::error::RoutingError;
use crate::message::RouteRequestHeader;
use crate::net::{InterfaceAddress, InterfaceIndex, Ipv4Header, Packet, Route, TimeUnit};
use crate::protocol::{
    ForwardHandler, MessageChannel, ProactiveProtocol, ReactiveProtocol, RoutingProtocol,
};
use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tracing::{debug, info};

/// Which side of the zone boundary a destination falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneDecision {
    /// Within the radius; the proactive protocol routes it
    Intra { distance: u64 },
    /// Beyond the radius or unknown; the reactive protocol routes it
    Inter { distance: u64 },
}

impl ZoneDecision {
    pub fn new(distance: u64, zone_radius: u32) -> Self {
        if is_within_zone(distance, zone_radius) {
            Self::Intra { distance }
        } else {
            Self::Inter { distance }
        }
    }

    pub fn distance(&self) -> u64 {
        match self {
            Self::Intra { distance } | Self::Inter { distance } => *distance,
        }
    }

    pub fn is_intra_zone(&self) -> bool {
        matches!(self, Self::Intra { .. })
    }
}

/// Node membership supplied at setup
///
/// Informational only: routing decisions never depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopologyHint {
    pub nodes: Vec<Ipv4Addr>,
}

impl TopologyHint {
    pub fn new(nodes: Vec<Ipv4Addr>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// The zone routing engine
///
/// Owns both delegates for its whole lifetime and shares its network context
/// with them. Every method runs to completion on the caller's thread; to use
/// one engine from several threads, confine it to a task with
/// [`crate::service::spawn_zone_router`].
pub struct ZoneRouter<P, R> {
    config: ZoneConfig,
    context: Option<Arc<dyn NetworkContext>>,
    proactive: P,
    reactive: R,
    cache: RouteCache,
    inter_zone: InterZoneMessaging,
    topology_hint: TopologyHint,
}

impl<P, R> ZoneRouter<P, R>
where
    P: ProactiveProtocol,
    R: ReactiveProtocol,
{
    /// Create an unattached engine with the default radius
    pub fn new(proactive: P, reactive: R) -> Self {
        Self::with_config(proactive, reactive, ZoneConfig::default())
    }

    /// Create an unattached engine with `config`
    pub fn with_config(proactive: P, reactive: R, config: ZoneConfig) -> Self {
        ZoneRouter {
            config,
            context: None,
            proactive,
            reactive,
            cache: RouteCache::new(),
            inter_zone: InterZoneMessaging::new(),
            topology_hint: TopologyHint::default(),
        }
    }

    /// Attach the network context, hand it to both delegates, rebuild the cache
    ///
    /// Must happen before any routing call.
    pub fn attach_network_context(&mut self, context: Arc<dyn NetworkContext>) {
        self.proactive.set_network_context(Arc::clone(&context));
        self.reactive.set_network_context(Arc::clone(&context));
        self.context = Some(context);
        self.refresh_cache();
        info!("Network context attached ({} cached networks)", self.cache.len());
    }

    /// One-shot setup: radius, topology hint and context together
    pub fn configure(
        &mut self,
        context: Arc<dyn NetworkContext>,
        topology_hint: TopologyHint,
        zone_radius: u32,
    ) {
        self.config.zone_radius = zone_radius;
        self.topology_hint = topology_hint;
        self.attach_network_context(context);
        info!(
            "Zone router configured: radius {}, {} nodes in topology",
            zone_radius,
            self.topology_hint.len()
        );
    }

    /// Change the zone radius for all later decisions
    ///
    /// The route cache does not depend on the radius and is left alone.
    pub fn set_zone_radius(&mut self, zone_radius: u32) {
        info!("Zone radius {} -> {}", self.config.zone_radius, zone_radius);
        self.config.zone_radius = zone_radius;
    }

    pub fn zone_radius(&self) -> u32 {
        self.config.zone_radius
    }

    pub fn config(&self) -> &ZoneConfig {
        &self.config
    }

    /// Whether a network context has been attached
    pub fn is_configured(&self) -> bool {
        self.context.is_some()
    }

    pub fn topology_hint(&self) -> &TopologyHint {
        &self.topology_hint
    }

    pub fn route_cache(&self) -> &RouteCache {
        &self.cache
    }

    /// Request/sequence counters for on-demand discovery
    pub fn inter_zone(&self) -> &InterZoneMessaging {
        &self.inter_zone
    }

    // Access individual delegates (mutable and immutable)

    pub fn proactive(&self) -> &P {
        &self.proactive
    }

    pub fn proactive_mut(&mut self) -> &mut P {
        &mut self.proactive
    }

    pub fn reactive(&self) -> &R {
        &self.reactive
    }

    pub fn reactive_mut(&mut self) -> &mut R {
        &mut self.reactive
    }

    /// Hop distance as the proactive protocol currently sees it
    pub fn distance_to(&self, destination: Ipv4Addr) -> u64 {
        distance_to(&self.proactive, destination, self.config.zone_radius)
    }

    /// THE CORE DECISION: which delegate owns this destination right now
    pub fn classify_destination(&self, destination: Ipv4Addr) -> ZoneDecision {
        ZoneDecision::new(self.distance_to(destination), self.config.zone_radius)
    }

    /// Run the proactive advertisement cycle now
    pub fn send_zone_advertisement(&mut self) {
        send_zone_advertisement(&mut self.proactive);
    }

    /// Feed one inbound advertisement to the proactive protocol
    pub fn receive_zone_advertisement(&mut self, channel: &mut dyn MessageChannel) -> bool {
        receive_zone_advertisement(&mut self.proactive, channel)
    }

    /// Originate a route request for `destination` through the reactive protocol
    pub fn originate_on_demand_request(
        &mut self,
        destination: Ipv4Addr,
    ) -> Result<RouteRequestHeader, RoutingError> {
        let context = self.context.as_deref().ok_or(RoutingError::NotConfigured)?;
        self.inter_zone
            .originate(&mut self.reactive, context, destination)
    }

    /// Feed one inbound on-demand message to the reactive protocol
    pub fn receive_on_demand_message(&mut self, channel: &mut dyn MessageChannel) -> bool {
        receive_on_demand_message(&mut self.reactive, channel)
    }

    fn refresh_cache(&mut self) {
        match self.context.as_deref() {
            Some(context) => self.cache.rebuild(context),
            None => self.cache.clear(),
        }
    }
}

impl<P, R> RoutingProtocol for ZoneRouter<P, R>
where
    P: ProactiveProtocol,
    R: ReactiveProtocol,
{
    fn set_network_context(&mut self, context: Arc<dyn NetworkContext>) {
        self.attach_network_context(context);
    }

    fn route_output(
        &mut self,
        packet: &Packet,
        header: &Ipv4Header,
        output_interface: Option<InterfaceIndex>,
    ) -> Result<Route, RoutingError> {
        if self.context.is_none() {
            return Err(RoutingError::NotConfigured);
        }

        let destination = header.destination;
        match self.classify_destination(destination) {
            ZoneDecision::Intra { distance } => {
                debug!(
                    "Proactive route for destination {} ({} hops, radius {})",
                    destination, distance, self.config.zone_radius
                );
                self.proactive.route_output(packet, header, output_interface)
            }
            ZoneDecision::Inter { distance } => {
                debug!(
                    "Reactive route for destination {} ({} hops, radius {})",
                    destination, distance, self.config.zone_radius
                );
                self.reactive.route_output(packet, header, output_interface)
            }
        }
    }

    fn route_input(
        &mut self,
        packet: &Packet,
        header: &Ipv4Header,
        input_interface: Option<InterfaceIndex>,
        handler: &mut dyn ForwardHandler,
    ) -> bool {
        if self.context.is_none() {
            handler.error(packet, header, RoutingError::NotConfigured);
            return false;
        }

        let destination = header.destination;
        match self.classify_destination(destination) {
            ZoneDecision::Intra { distance } => {
                debug!(
                    "Proactive input for destination {} ({} hops)",
                    destination, distance
                );
                self.proactive
                    .route_input(packet, header, input_interface, handler)
            }
            ZoneDecision::Inter { distance } => {
                debug!(
                    "Reactive input for destination {} ({} hops)",
                    destination, distance
                );
                self.reactive
                    .route_input(packet, header, input_interface, handler)
            }
        }
    }

    fn notify_interface_up(&mut self, interface: InterfaceIndex) {
        debug!("Interface {} up", interface);
        self.refresh_cache();
    }

    fn notify_interface_down(&mut self, interface: InterfaceIndex) {
        debug!("Interface {} down", interface);
        self.refresh_cache();
    }

    fn notify_address_added(&mut self, interface: InterfaceIndex, address: InterfaceAddress) {
        debug!("Address {} added on interface {}", address.local, interface);
        self.refresh_cache();
    }

    fn notify_address_removed(&mut self, interface: InterfaceIndex, address: InterfaceAddress) {
        debug!("Address {} removed from interface {}", address.local, interface);
        self.refresh_cache();
    }

    /// Only the locally synthesized cache is printed, never the delegates' tables
    fn print_routing_table(&self, sink: &mut dyn io::Write, unit: TimeUnit) -> io::Result<()> {
        self.cache.write_table(sink, unit)
    }
}
