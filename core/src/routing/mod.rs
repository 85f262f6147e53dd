//! Zone Routing: proactive inside the zone, reactive beyond it
//!
//! Two-band routing around each node:
//! - Intra-zone: destinations within `zone_radius` hops, routed by a proactive
//!   (table-driven) protocol that already knows their paths
//! - Inter-zone: everything else, routed by a reactive (on-demand) protocol
//! - Engine: measures hop distance from the proactive topology table and hands
//!   each call to the protocol owning that band
//!
//! The classifier and cache describe the node's own attached networks; the
//! intra/inter modules drive each delegate's control traffic.

pub mod cache;
pub mod classifier;
pub mod distance;
pub mod engine;
pub mod inter;
pub mod intra;

pub use cache::{RouteCache, RouteCacheEntry, TABLE_HEADER};
pub use classifier::{classify, network_address_of, AddressClass};
pub use distance::{distance_to, is_within_zone, unknown_distance};
pub use engine::{TopologyHint, ZoneDecision, ZoneRouter};
pub use inter::{InterZoneMessaging, UNKNOWN_DESTINATION_SEQNO};
