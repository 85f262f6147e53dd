//! Hop distance from the proactive protocol's topology table
//!
//! Recomputed on every decision so it always reflects the proactive
//! protocol's latest view. A destination missing from the table gets
//! `zone_radius + 1`, which can never pass the within-zone test and so sends
//! undiscovered destinations down the reactive path.
//!
//! Distances are widened to `u64` so the sentinel exists for every `u32`
//! radius, `u32::MAX` included.

use crate::protocol::ProactiveProtocol;
use std::net::Ipv4Addr;

/// Hop count to `destination`, or `zone_radius + 1` if the proactive side doesn't know it
pub fn distance_to<P>(proactive: &P, destination: Ipv4Addr, zone_radius: u32) -> u64
where
    P: ProactiveProtocol + ?Sized,
{
    proactive
        .topology_entries()
        .iter()
        .find(|entry| entry.destination == destination)
        .map(|entry| u64::from(entry.distance))
        .unwrap_or_else(|| unknown_distance(zone_radius))
}

/// Sentinel distance for destinations outside the proactive table
pub fn unknown_distance(zone_radius: u32) -> u64 {
    u64::from(zone_radius) + 1
}

pub fn is_within_zone(distance: u64, zone_radius: u32) -> bool {
    distance <= u64::from(zone_radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::TopologyEntry;
    use crate::testing::FakeProactive;
    use proptest::prelude::*;

    fn ip(last: u8) -> Ipv4Addr {
        Ipv4Addr::new(10, 1, 1, last)
    }

    fn proactive_with(entries: &[(u8, u32)]) -> FakeProactive {
        let mut proactive = FakeProactive::new();
        for (last, distance) in entries {
            proactive.add_topology_entry(TopologyEntry {
                destination: ip(*last),
                distance: *distance,
            });
        }
        proactive
    }

    #[test]
    fn test_known_destination_returns_recorded_distance() {
        let proactive = proactive_with(&[(2, 1), (3, 2), (4, 5)]);
        assert_eq!(distance_to(&proactive, ip(2), 2), 1);
        assert_eq!(distance_to(&proactive, ip(4), 2), 5);
    }

    #[test]
    fn test_unknown_destination_returns_sentinel() {
        let proactive = proactive_with(&[(2, 1)]);
        assert_eq!(distance_to(&proactive, ip(99), 2), 3);
        assert_eq!(distance_to(&proactive, ip(99), 0), 1);
    }

    #[test]
    fn test_exact_match_only() {
        let proactive = proactive_with(&[(2, 1)]);
        // Same classful network, different host
        assert_eq!(distance_to(&proactive, ip(20), 4), 5);
    }

    #[test]
    fn test_first_entry_wins_on_duplicates() {
        let proactive = proactive_with(&[(2, 1), (2, 4)]);
        assert_eq!(distance_to(&proactive, ip(2), 2), 1);
    }

    #[test]
    fn test_zero_distance_is_within_zero_radius() {
        let proactive = proactive_with(&[(1, 0)]);
        assert!(is_within_zone(distance_to(&proactive, ip(1), 0), 0));
    }

    #[test]
    fn test_unknown_destination_at_max_radius() {
        let proactive = proactive_with(&[(2, u32::MAX)]);

        assert_eq!(distance_to(&proactive, ip(99), u32::MAX), 1 << 32);
        assert!(!is_within_zone(distance_to(&proactive, ip(99), u32::MAX), u32::MAX));
        assert!(is_within_zone(distance_to(&proactive, ip(2), u32::MAX), u32::MAX));
    }

    proptest! {
        #[test]
        fn prop_unknown_destination_never_within_zone(
            radius in any::<u32>(),
            last in any::<u8>()
        ) {
            let proactive = FakeProactive::new();
            let distance = distance_to(&proactive, ip(last), radius);
            prop_assert_eq!(distance, u64::from(radius) + 1);
            prop_assert!(!is_within_zone(distance, radius));
        }
    }
}
