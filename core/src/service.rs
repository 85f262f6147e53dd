//! Zone router task for multi-threaded hosts
//!
//! A zone router and its two delegates share one network context and are not
//! meant to be touched from more than one thread. [`spawn_zone_router`] moves
//! the router into a tokio task that applies commands one at a time, in the
//! order they were sent. [`ZoneRouterHandle`] is the cloneable front end.
//!
//! Input routing cannot lend a handler across the task boundary, so the
//! handle returns the collected [`ForwardAction`]s for the caller to act on.

use crate::error::RoutingError;
use crate::message::RouteRequestHeader;
use crate::net::{InterfaceAddress, InterfaceIndex, Ipv4Header, Packet, Route, TimeUnit};
use crate::protocol::{
    ForwardAction, ForwardActions, ProactiveProtocol, ReactiveProtocol, RoutingProtocol,
};
use crate::routing::{RouteCache, ZoneDecision, ZoneRouter};
use anyhow::Result;
use std::net::Ipv4Addr;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Outcome of input routing performed inside the router task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputOutcome {
    pub handled: bool,
    pub actions: Vec<ForwardAction>,
}

/// Commands accepted by the router task
enum RouterCommand {
    RouteOutput {
        packet: Packet,
        header: Ipv4Header,
        output_interface: Option<InterfaceIndex>,
        reply: mpsc::Sender<Result<Route, RoutingError>>,
    },
    RouteInput {
        packet: Packet,
        header: Ipv4Header,
        input_interface: Option<InterfaceIndex>,
        reply: mpsc::Sender<InputOutcome>,
    },
    InterfaceUp(InterfaceIndex),
    InterfaceDown(InterfaceIndex),
    AddressAdded(InterfaceIndex, InterfaceAddress),
    AddressRemoved(InterfaceIndex, InterfaceAddress),
    SetZoneRadius(u32),
    ClassifyDestination {
        destination: Ipv4Addr,
        reply: mpsc::Sender<ZoneDecision>,
    },
    SendZoneAdvertisement,
    OriginateRequest {
        destination: Ipv4Addr,
        reply: mpsc::Sender<Result<RouteRequestHeader, RoutingError>>,
    },
    PrintRoutingTable {
        unit: TimeUnit,
        reply: mpsc::Sender<Result<String, String>>,
    },
    RouteCacheSnapshot {
        reply: mpsc::Sender<RouteCache>,
    },
    Shutdown,
}

/// Handle to a zone router running in its own task
#[derive(Clone)]
pub struct ZoneRouterHandle {
    command_tx: mpsc::Sender<RouterCommand>,
}

impl ZoneRouterHandle {
    async fn send(&self, command: RouterCommand) -> Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| anyhow::anyhow!("Zone router task not running"))
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(mpsc::Sender<T>) -> RouterCommand,
    ) -> Result<T> {
        let (reply_tx, mut reply_rx) = mpsc::channel(1);
        self.send(command(reply_tx)).await?;

        reply_rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("No reply from zone router"))
    }

    /// Route a locally originated packet
    ///
    /// Routing failures come back as a [`RoutingError`] inside the error.
    pub async fn route_output(
        &self,
        packet: Packet,
        header: Ipv4Header,
        output_interface: Option<InterfaceIndex>,
    ) -> Result<Route> {
        self.request(|reply| RouterCommand::RouteOutput {
            packet,
            header,
            output_interface,
            reply,
        })
        .await?
        .map_err(anyhow::Error::from)
    }

    /// Route a received packet, returning what the chosen delegate asked for
    pub async fn route_input(
        &self,
        packet: Packet,
        header: Ipv4Header,
        input_interface: Option<InterfaceIndex>,
    ) -> Result<InputOutcome> {
        self.request(|reply| RouterCommand::RouteInput {
            packet,
            header,
            input_interface,
            reply,
        })
        .await
    }

    pub async fn notify_interface_up(&self, interface: InterfaceIndex) -> Result<()> {
        self.send(RouterCommand::InterfaceUp(interface)).await
    }

    pub async fn notify_interface_down(&self, interface: InterfaceIndex) -> Result<()> {
        self.send(RouterCommand::InterfaceDown(interface)).await
    }

    pub async fn notify_address_added(
        &self,
        interface: InterfaceIndex,
        address: InterfaceAddress,
    ) -> Result<()> {
        self.send(RouterCommand::AddressAdded(interface, address)).await
    }

    pub async fn notify_address_removed(
        &self,
        interface: InterfaceIndex,
        address: InterfaceAddress,
    ) -> Result<()> {
        self.send(RouterCommand::AddressRemoved(interface, address)).await
    }

    pub async fn set_zone_radius(&self, zone_radius: u32) -> Result<()> {
        self.send(RouterCommand::SetZoneRadius(zone_radius)).await
    }

    pub async fn classify_destination(&self, destination: Ipv4Addr) -> Result<ZoneDecision> {
        self.request(|reply| RouterCommand::ClassifyDestination { destination, reply })
            .await
    }

    pub async fn send_zone_advertisement(&self) -> Result<()> {
        self.send(RouterCommand::SendZoneAdvertisement).await
    }

    pub async fn originate_on_demand_request(
        &self,
        destination: Ipv4Addr,
    ) -> Result<RouteRequestHeader> {
        self.request(|reply| RouterCommand::OriginateRequest { destination, reply })
            .await?
            .map_err(anyhow::Error::from)
    }

    /// Routing table dump as text
    pub async fn print_routing_table(&self, unit: TimeUnit) -> Result<String> {
        self.request(|reply| RouterCommand::PrintRoutingTable { unit, reply })
            .await?
            .map_err(|e| anyhow::anyhow!(e))
    }

    /// Copy of the current route cache
    pub async fn route_cache(&self) -> Result<RouteCache> {
        self.request(|reply| RouterCommand::RouteCacheSnapshot { reply })
            .await
    }

    /// Stop the task; the router and its delegates are dropped
    pub async fn shutdown(&self) -> Result<()> {
        self.send(RouterCommand::Shutdown).await
    }
}

/// Move `router` into a new tokio task and return a handle to it
///
/// Must be called from within a tokio runtime.
pub fn spawn_zone_router<P, R>(router: ZoneRouter<P, R>) -> ZoneRouterHandle
where
    P: ProactiveProtocol + Send + 'static,
    R: ReactiveProtocol + Send + 'static,
{
    let (command_tx, command_rx) = mpsc::channel::<RouterCommand>(256);
    tokio::spawn(run_router(router, command_rx));
    ZoneRouterHandle { command_tx }
}

async fn run_router<P, R>(
    mut router: ZoneRouter<P, R>,
    mut command_rx: mpsc::Receiver<RouterCommand>,
) where
    P: ProactiveProtocol,
    R: ReactiveProtocol,
{
    info!("Zone router task started");

    while let Some(command) = command_rx.recv().await {
        match command {
            RouterCommand::RouteOutput {
                packet,
                header,
                output_interface,
                reply,
            } => {
                let result = router.route_output(&packet, &header, output_interface);
                let _ = reply.send(result).await;
            }
            RouterCommand::RouteInput {
                packet,
                header,
                input_interface,
                reply,
            } => {
                let mut collected = ForwardActions::new();
                let handled = router.route_input(&packet, &header, input_interface, &mut collected);
                let _ = reply
                    .send(InputOutcome {
                        handled,
                        actions: collected.actions,
                    })
                    .await;
            }
            RouterCommand::InterfaceUp(interface) => router.notify_interface_up(interface),
            RouterCommand::InterfaceDown(interface) => router.notify_interface_down(interface),
            RouterCommand::AddressAdded(interface, address) => {
                router.notify_address_added(interface, address)
            }
            RouterCommand::AddressRemoved(interface, address) => {
                router.notify_address_removed(interface, address)
            }
            RouterCommand::SetZoneRadius(zone_radius) => router.set_zone_radius(zone_radius),
            RouterCommand::ClassifyDestination { destination, reply } => {
                let _ = reply.send(router.classify_destination(destination)).await;
            }
            RouterCommand::SendZoneAdvertisement => router.send_zone_advertisement(),
            RouterCommand::OriginateRequest { destination, reply } => {
                let _ = reply
                    .send(router.originate_on_demand_request(destination))
                    .await;
            }
            RouterCommand::PrintRoutingTable { unit, reply } => {
                let mut out = Vec::new();
                let result = router
                    .print_routing_table(&mut out, unit)
                    .map(|_| String::from_utf8_lossy(&out).into_owned())
                    .map_err(|e| e.to_string());
                let _ = reply.send(result).await;
            }
            RouterCommand::RouteCacheSnapshot { reply } => {
                let _ = reply.send(router.route_cache().clone()).await;
            }
            RouterCommand::Shutdown => {
                debug!("Zone router shutdown requested");
                break;
            }
        }
    }

    info!("Zone router task stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::StaticNetworkContext;
    use crate::protocol::TopologyEntry;
    use crate::routing::TopologyHint;
    use crate::testing::{FakeProactive, FakeReactive};
    use std::sync::Arc;

    fn ip(last: u8) -> Ipv4Addr {
        Ipv4Addr::new(10, 1, 1, last)
    }

    fn spawn_configured() -> ZoneRouterHandle {
        let ctx = StaticNetworkContext::new();
        ctx.add_interface(vec![InterfaceAddress::new(
            ip(1),
            Ipv4Addr::new(255, 255, 255, 0),
        )]);

        let mut proactive = FakeProactive::new();
        proactive.add_topology_entry(TopologyEntry {
            destination: ip(2),
            distance: 1,
        });
        proactive.handle_input(true);

        let mut router = ZoneRouter::new(proactive, FakeReactive::new());
        router.configure(Arc::new(ctx), TopologyHint::default(), 2);
        spawn_zone_router(router)
    }

    #[tokio::test]
    async fn test_handle_routes_output() {
        let handle = spawn_configured();
        let route = handle
            .route_output(Packet::new(), Ipv4Header::to(ip(2)), None)
            .await
            .unwrap();
        assert_eq!(route.destination, ip(2));
    }

    #[tokio::test]
    async fn test_handle_collects_input_actions() {
        let handle = spawn_configured();
        let outcome = handle
            .route_input(Packet::new(), Ipv4Header::to(ip(2)), Some(1))
            .await
            .unwrap();

        assert!(outcome.handled);
        assert_eq!(outcome.actions, vec![ForwardAction::LocalDeliver(1)]);
    }

    #[tokio::test]
    async fn test_handle_max_radius_keeps_unknown_inter_zone() {
        let handle = spawn_configured();
        handle.set_zone_radius(u32::MAX).await.unwrap();

        assert!(handle.classify_destination(ip(2)).await.unwrap().is_intra_zone());
        assert!(!handle
            .classify_destination(Ipv4Addr::new(8, 8, 8, 8))
            .await
            .unwrap()
            .is_intra_zone());
    }

    #[tokio::test]
    async fn test_handle_after_shutdown() {
        let handle = spawn_configured();
        handle.shutdown().await.unwrap();

        let result = handle.classify_destination(ip(2)).await;
        assert!(result.is_err());
    }
}
