//! Local route cache
//!
//! One synthesized entry per locally attached network, keyed by the classful
//! network address of each interface address. Entries point at the broadcast
//! address with no gateway, so they describe "this network is on that link",
//! not unicast next hops.
//!
//! The cache is only ever rebuilt from scratch. It is never consulted by the
//! live forwarding decision; it backs the routing table dump and on-link
//! lookups for diagnostics.

use super::classifier::network_address_of;
use crate::context::NetworkContext;
use crate::net::{Route, TimeUnit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io;
use std::net::Ipv4Addr;
use tracing::trace;

/// Header line of the routing table dump
pub const TABLE_HEADER: &str = "ZRP Routing Table";

/// A cached on-link route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCacheEntry {
    pub network: Ipv4Addr,
    pub route: Route,
}

/// Network address → on-link route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteCache {
    entries: BTreeMap<Ipv4Addr, Route>,
}

impl RouteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole cache from the context's current interface state
    ///
    /// Down interfaces contribute nothing. When two addresses share a network,
    /// the interface scanned last wins.
    pub fn rebuild(&mut self, context: &dyn NetworkContext) {
        self.entries.clear();

        for iface in context.interfaces().into_iter().filter(|iface| iface.up) {
            for address in &iface.addresses {
                let network = network_address_of(address.local);
                let route = Route::new(Ipv4Addr::BROADCAST, Ipv4Addr::UNSPECIFIED, iface.index);
                trace!("Cache {} -> interface {}", network, iface.index);
                self.entries.insert(network, route);
            }
        }
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entry keyed by an exact network address
    pub fn get(&self, network: Ipv4Addr) -> Option<&Route> {
        self.entries.get(&network)
    }

    /// On-link route for a destination, if its network is attached
    pub fn lookup(&self, destination: Ipv4Addr) -> Option<&Route> {
        self.entries.get(&network_address_of(destination))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in network address order
    pub fn iter(&self) -> impl Iterator<Item = RouteCacheEntry> + '_ {
        self.entries
            .iter()
            .map(|(network, route)| RouteCacheEntry {
                network: *network,
                route: *route,
            })
    }

    /// Write the header and one `network -> gateway via ifindex` line per entry
    pub fn write_table(&self, sink: &mut dyn io::Write, unit: TimeUnit) -> io::Result<()> {
        writeln!(sink, "{} (time unit: {})", TABLE_HEADER, unit)?;
        for entry in self.iter() {
            writeln!(
                sink,
                "{} -> {} via {}",
                entry.network, entry.route.gateway, entry.route.output_interface
            )?;
        }
        Ok(())
    }
}
