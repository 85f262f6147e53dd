//! Network context: the node's interface and address state
//!
//! The host network stack owns interfaces and addresses. The engine and both
//! sub-protocols hold a shared, read-only view through [`NetworkContext`] for
//! their whole lifetime; the host keeps the context alive for at least as long
//! as any routing protocol attached to it.

use crate::net::{InterfaceAddress, InterfaceIndex};
use parking_lot::RwLock;
use std::net::Ipv4Addr;
use tracing::debug;

/// Snapshot of one interface
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceState {
    pub index: InterfaceIndex,
    pub up: bool,
    pub addresses: Vec<InterfaceAddress>,
}

/// Read-only view of the node's network layer
#[cfg_attr(test, mockall::automock)]
pub trait NetworkContext: Send + Sync {
    /// All interfaces in index order
    fn interfaces(&self) -> Vec<InterfaceState>;

    /// Address this node originates control traffic from
    ///
    /// Defaults to the first non-loopback address on the first up interface
    /// that has one.
    fn primary_address(&self) -> Option<Ipv4Addr> {
        self.interfaces()
            .into_iter()
            .filter(|iface| iface.up)
            .flat_map(|iface| iface.addresses)
            .map(|addr| addr.local)
            .find(|local| !local.is_loopback())
    }
}

// ============================================================================
// IN-MEMORY CONTEXT
// ============================================================================

/// Interface table kept in memory, mutable by the host through `&self`
///
/// Mutators only change state; the host is expected to follow each change
/// with the matching `notify_*` call on the routing protocol, as a real stack
/// would.
#[derive(Debug, Default)]
pub struct StaticNetworkContext {
    interfaces: RwLock<Vec<InterfaceState>>,
}

impl StaticNetworkContext {
    /// Empty context with no interfaces
    pub fn new() -> Self {
        Self::default()
    }

    /// Context with a loopback interface at index 0 (`127.0.0.1/8`)
    pub fn with_loopback() -> Self {
        let ctx = Self::new();
        ctx.add_interface(vec![InterfaceAddress::new(
            Ipv4Addr::LOCALHOST,
            Ipv4Addr::new(255, 0, 0, 0),
        )]);
        ctx
    }

    /// Add an interface in the up state, returning its index
    pub fn add_interface(&self, addresses: Vec<InterfaceAddress>) -> InterfaceIndex {
        let mut interfaces = self.interfaces.write();
        let index = interfaces.len() as InterfaceIndex;
        interfaces.push(InterfaceState {
            index,
            up: true,
            addresses,
        });
        debug!("Interface {} added", index);
        index
    }

    /// Set an interface up or down. Returns false for an unknown index.
    pub fn set_up(&self, index: InterfaceIndex, up: bool) -> bool {
        match self.interfaces.write().get_mut(index as usize) {
            Some(iface) => {
                iface.up = up;
                true
            }
            None => false,
        }
    }

    /// Bind another address to an interface. Returns false for an unknown index.
    pub fn add_address(&self, index: InterfaceIndex, address: InterfaceAddress) -> bool {
        match self.interfaces.write().get_mut(index as usize) {
            Some(iface) => {
                if !iface.addresses.contains(&address) {
                    iface.addresses.push(address);
                }
                true
            }
            None => false,
        }
    }

    /// Unbind an address. Returns false if it was not bound.
    pub fn remove_address(&self, index: InterfaceIndex, local: Ipv4Addr) -> bool {
        match self.interfaces.write().get_mut(index as usize) {
            Some(iface) => {
                let before = iface.addresses.len();
                iface.addresses.retain(|addr| addr.local != local);
                iface.addresses.len() != before
            }
            None => false,
        }
    }
}

impl NetworkContext for StaticNetworkContext {
    fn interfaces(&self) -> Vec<InterfaceState> {
        self.interfaces.read().clone()
    }
}
