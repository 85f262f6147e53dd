// ZRP Core: Hybrid Zone Routing
//
// A node routes destinations within its zone radius through a proactive,
// table-driven protocol and everything beyond it through a reactive,
// on-demand protocol. This crate owns only that decision; the two
// sub-protocols are plugged in through the traits in `protocol`.

pub mod config;
pub mod context;
pub mod error;
pub mod helper;
pub mod logging;
pub mod message;
pub mod net;
pub mod protocol;
pub mod routing;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use config::{ZoneConfig, DEFAULT_ZONE_RADIUS};
pub use context::{InterfaceState, NetworkContext, StaticNetworkContext};
pub use error::{ConfigError, RoutingError, WireError};
pub use helper::{ZoneRoutingHelper, ZONE_RADIUS_ATTRIBUTE};
pub use message::RouteRequestHeader;
pub use net::{
    InterfaceAddress, InterfaceIndex, Ipv4Header, MulticastRoute, Packet, Route, TimeUnit,
};
pub use protocol::{
    ForwardAction, ForwardActions, ForwardHandler, MessageChannel, NullForwardHandler,
    ProactiveProtocol, ReactiveProtocol, RoutingProtocol, TopologyEntry,
};
pub use routing::{RouteCache, TopologyHint, ZoneDecision, ZoneRouter};
pub use service::{spawn_zone_router, InputOutcome, ZoneRouterHandle};
