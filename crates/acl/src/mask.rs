//! crates/acl/src/mask.rs
//!
//! Host-bit masking for IPv4 and IPv6 addresses.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Maximum prefix length of an IPv4 network.
pub const IPV4_MAX_BITS: u8 = 32;
/// Maximum prefix length of an IPv6 network.
pub const IPV6_MAX_BITS: u8 = 128;

/// Zeroes the low `32 - bits` bits of `addr`.
///
/// `bits` of zero yields `0.0.0.0`; values above 32 leave the address intact.
#[must_use]
pub fn mask_ipv4(addr: Ipv4Addr, bits: u8) -> Ipv4Addr {
    let shift = u32::from(IPV4_MAX_BITS - bits.min(IPV4_MAX_BITS));
    let mask = u32::MAX.checked_shl(shift).unwrap_or(0);
    Ipv4Addr::from(u32::from(addr) & mask)
}

/// Zeroes the low `128 - bits` bits of `addr`.
///
/// The 32-bit word holding the boundary is partially masked and every later
/// word is cleared. `bits` of zero yields `::`; values above 128 leave the
/// address intact.
#[must_use]
pub fn mask_ipv6(addr: Ipv6Addr, bits: u8) -> Ipv6Addr {
    let shift = u32::from(IPV6_MAX_BITS - bits.min(IPV6_MAX_BITS));
    let mask = u128::MAX.checked_shl(shift).unwrap_or(0);
    Ipv6Addr::from(u128::from(addr) & mask)
}
