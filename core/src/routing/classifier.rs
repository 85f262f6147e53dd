//! Classful network address derivation
//!
//! Route cache keys are derived with the pre-CIDR A/B/C rules: no masks are
//! consulted, only the leading bits of the address. Class D and E addresses
//! fall through to the /24 branch along with Class C.

use std::net::Ipv4Addr;

const CLASS_A_MASK: u32 = 0xff00_0000;
const CLASS_B_MASK: u32 = 0xffff_0000;
const CLASS_C_MASK: u32 = 0xffff_ff00;

/// Address class by leading bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressClass {
    /// Leading bit `0`, /8
    A,
    /// Leading bits `10`, /16
    B,
    /// Everything else, /24
    C,
}

impl AddressClass {
    pub fn mask(self) -> u32 {
        match self {
            Self::A => CLASS_A_MASK,
            Self::B => CLASS_B_MASK,
            Self::C => CLASS_C_MASK,
        }
    }
}

pub fn classify(address: Ipv4Addr) -> AddressClass {
    let bits = u32::from(address);
    if bits & 0x8000_0000 == 0 {
        AddressClass::A
    } else if bits & 0xc000_0000 == 0x8000_0000 {
        AddressClass::B
    } else {
        AddressClass::C
    }
}

/// Network address containing `address` under classful masking
pub fn network_address_of(address: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(address) & classify(address).mask())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_class_a() {
        assert_eq!(network_address_of(Ipv4Addr::new(10, 1, 1, 5)), Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(classify(Ipv4Addr::new(10, 1, 1, 5)), AddressClass::A);
    }

    #[test]
    fn test_class_b() {
        assert_eq!(
            network_address_of(Ipv4Addr::new(172, 16, 5, 9)),
            Ipv4Addr::new(172, 16, 0, 0)
        );
        assert_eq!(classify(Ipv4Addr::new(172, 16, 5, 9)), AddressClass::B);
    }

    #[test]
    fn test_class_c() {
        assert_eq!(
            network_address_of(Ipv4Addr::new(192, 168, 1, 7)),
            Ipv4Addr::new(192, 168, 1, 0)
        );
    }

    #[test]
    fn test_class_d_and_e_fold_into_c() {
        assert_eq!(
            network_address_of(Ipv4Addr::new(224, 0, 0, 251)),
            Ipv4Addr::new(224, 0, 0, 0)
        );
        assert_eq!(classify(Ipv4Addr::new(240, 1, 2, 3)), AddressClass::C);
        assert_eq!(
            network_address_of(Ipv4Addr::BROADCAST),
            Ipv4Addr::new(255, 255, 255, 0)
        );
    }

    #[test]
    fn test_class_boundaries() {
        assert_eq!(classify(Ipv4Addr::new(127, 255, 255, 255)), AddressClass::A);
        assert_eq!(classify(Ipv4Addr::new(128, 0, 0, 0)), AddressClass::B);
        assert_eq!(classify(Ipv4Addr::new(191, 255, 255, 255)), AddressClass::B);
        assert_eq!(classify(Ipv4Addr::new(192, 0, 0, 0)), AddressClass::C);
    }

    proptest! {
        #[test]
        fn prop_network_address_is_idempotent(bits in any::<u32>()) {
            let addr = Ipv4Addr::from(bits);
            let net = network_address_of(addr);
            prop_assert_eq!(network_address_of(net), net);
        }

        #[test]
        fn prop_masking_preserves_class(bits in any::<u32>()) {
            let addr = Ipv4Addr::from(bits);
            prop_assert_eq!(classify(network_address_of(addr)), classify(addr));
        }

        #[test]
        fn prop_network_address_only_clears_host_bits(bits in any::<u32>()) {
            let addr = Ipv4Addr::from(bits);
            let net = u32::from(network_address_of(addr));
            prop_assert_eq!(net & !bits, 0);
            prop_assert_eq!(bits & classify(addr).mask(), net);
        }
    }
}
