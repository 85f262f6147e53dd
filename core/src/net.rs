//! Network-layer value types shared by the engine and its delegates
//!
//! These mirror what a host IPv4 stack hands to a routing protocol: an opaque
//! packet, the IPv4 header fields routing cares about, and the route triple
//! (destination, gateway, output interface) a forwarding decision produces.
//! Interfaces and devices are referred to by index only; the host owns them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv4Addr;

/// Host-assigned interface index (0 is conventionally the loopback)
pub type InterfaceIndex = u32;

/// Opaque packet payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Packet {
    data: Vec<u8>,
}

impl Packet {
    /// An empty packet
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Prepend a serialized header, the way a stack pushes headers on send
    pub fn add_header(&mut self, header: &[u8]) {
        let mut data = Vec::with_capacity(header.len() + self.data.len());
        data.extend_from_slice(header);
        data.extend_from_slice(&self.data);
        self.data = data;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// IPv4 header fields visible to routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Header {
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub ttl: u8,
    pub protocol: u8,
}

impl Ipv4Header {
    /// Header with only the destination set, everything else defaulted
    pub fn to(destination: Ipv4Addr) -> Self {
        Self {
            destination,
            ..Self::default()
        }
    }
}

impl Default for Ipv4Header {
    fn default() -> Self {
        Self {
            source: Ipv4Addr::UNSPECIFIED,
            destination: Ipv4Addr::UNSPECIFIED,
            ttl: 64,
            protocol: 0,
        }
    }
}

/// A unicast route: forward toward `destination` through `gateway` on `output_interface`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    pub destination: Ipv4Addr,
    /// `0.0.0.0` means on-link, no gateway
    pub gateway: Ipv4Addr,
    pub output_interface: InterfaceIndex,
}

impl Route {
    pub fn new(destination: Ipv4Addr, gateway: Ipv4Addr, output_interface: InterfaceIndex) -> Self {
        Self {
            destination,
            gateway,
            output_interface,
        }
    }

    /// Whether this route sends directly on the link (no gateway)
    pub fn is_on_link(&self) -> bool {
        self.gateway.is_unspecified()
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} via {} dev {}",
            self.destination, self.gateway, self.output_interface
        )
    }
}

/// A multicast route as handed to the multicast-forward callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MulticastRoute {
    pub group: Ipv4Addr,
    pub origin: Ipv4Addr,
    pub parent_interface: InterfaceIndex,
    /// Output interface → TTL threshold
    pub output_ttls: Vec<(InterfaceIndex, u8)>,
}

/// An address bound to an interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceAddress {
    pub local: Ipv4Addr,
    pub mask: Ipv4Addr,
}

impl InterfaceAddress {
    pub fn new(local: Ipv4Addr, mask: Ipv4Addr) -> Self {
        Self { local, mask }
    }
}

/// Unit used when a routing table dump prints times
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeUnit {
    Ns,
    Us,
    Ms,
    #[default]
    S,
    Min,
    H,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ns => write!(f, "ns"),
            Self::Us => write!(f, "us"),
            Self::Ms => write!(f, "ms"),
            Self::S => write!(f, "s"),
            Self::Min => write!(f, "min"),
            Self::H => write!(f, "h"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_header_prepends() {
        let mut packet = Packet::from_bytes(vec![9, 9]);
        packet.add_header(&[1, 2, 3]);
        assert_eq!(packet.as_bytes(), &[1, 2, 3, 9, 9]);
        assert_eq!(packet.len(), 5);
    }

    #[test]
    fn test_header_to_defaults() {
        let header = Ipv4Header::to(Ipv4Addr::new(10, 1, 1, 9));
        assert_eq!(header.destination, Ipv4Addr::new(10, 1, 1, 9));
        assert!(header.source.is_unspecified());
        assert_eq!(header.ttl, 64);
    }

    #[test]
    fn test_route_on_link() {
        let route = Route::new(Ipv4Addr::BROADCAST, Ipv4Addr::UNSPECIFIED, 1);
        assert!(route.is_on_link());
        assert_eq!(route.to_string(), "255.255.255.255 via 0.0.0.0 dev 1");
    }
}
