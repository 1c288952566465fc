use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

use socket2::SockAddr;

use crate::mask::{mask_ipv4, mask_ipv6};
use crate::pattern::HostPattern;

/// Address-or-pattern payload of a [`SenderEntry`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NetAddr {
    /// Network prefix. Host bits below `bits` are zero and the port is zero.
    Network {
        /// Masked network address. IPv6 entries keep their scope id.
        addr: SocketAddr,
        /// Prefix length, 1 through 32 for IPv4 and 1 through 128 for IPv6.
        bits: u8,
    },
    /// Hostname wildcard matched against the peer's verified name.
    Pattern(HostPattern),
}

/// One allowed-sender rule.
///
/// Entries are created by [`ListBuilder`](crate::ListBuilder) and never change
/// afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SenderEntry {
    addr: NetAddr,
}

impl SenderEntry {
    /// IPv4 network entry. `addr` is masked to `bits`.
    pub(crate) fn ipv4(addr: Ipv4Addr, bits: u8) -> Self {
        Self {
            addr: NetAddr::Network {
                addr: SocketAddr::V4(SocketAddrV4::new(mask_ipv4(addr, bits), 0)),
                bits,
            },
        }
    }

    /// IPv6 network entry. `addr` is masked to `bits`; `scope_id` is kept.
    pub(crate) fn ipv6(addr: Ipv6Addr, scope_id: u32, bits: u8) -> Self {
        Self {
            addr: NetAddr::Network {
                addr: SocketAddr::V6(SocketAddrV6::new(mask_ipv6(addr, bits), 0, 0, scope_id)),
                bits,
            },
        }
    }

    pub(crate) fn pattern(text: impl Into<String>) -> Self {
        Self {
            addr: NetAddr::Pattern(HostPattern::new(text)),
        }
    }

    /// Returns the address-or-pattern payload.
    #[must_use]
    pub const fn addr(&self) -> &NetAddr {
        &self.addr
    }

    /// Returns the prefix length of a network entry.
    #[must_use]
    pub const fn bits(&self) -> Option<u8> {
        match self.addr {
            NetAddr::Network { bits, .. } => Some(bits),
            NetAddr::Pattern(_) => None,
        }
    }

    /// Returns the hostname pattern of a pattern entry.
    #[must_use]
    pub const fn host_pattern(&self) -> Option<&HostPattern> {
        match &self.addr {
            NetAddr::Pattern(pattern) => Some(pattern),
            NetAddr::Network { .. } => None,
        }
    }

    /// Returns `true` if `peer` (or, for pattern entries, `hostname`) is
    /// covered by this entry.
    ///
    /// Pattern entries never match a missing or empty hostname. An IPv4 entry
    /// also matches an IPv4-mapped IPv6 peer. An IPv6 entry with a non-zero
    /// scope id only matches peers with the same scope id. Peers that are not
    /// IPv4 or IPv6 never match a network entry.
    #[must_use]
    pub fn matches(&self, peer: &SockAddr, hostname: Option<&str>) -> bool {
        match &self.addr {
            NetAddr::Pattern(pattern) => hostname
                .filter(|name| !name.is_empty())
                .is_some_and(|name| pattern.matches(name)),
            NetAddr::Network { addr, bits } => peer
                .as_socket()
                .is_some_and(|source| network_matches(addr, *bits, &source)),
        }
    }
}

fn network_matches(entry: &SocketAddr, bits: u8, source: &SocketAddr) -> bool {
    match (entry, source) {
        (SocketAddr::V4(entry), SocketAddr::V4(source)) => {
            mask_ipv4(*source.ip(), bits) == *entry.ip()
        }
        (SocketAddr::V6(entry), SocketAddr::V6(source)) => {
            mask_ipv6(*source.ip(), bits) == *entry.ip()
                && (entry.scope_id() == 0 || entry.scope_id() == source.scope_id())
        }
        (SocketAddr::V4(entry), SocketAddr::V6(source)) => source
            .ip()
            .to_ipv4_mapped()
            .is_some_and(|mapped| mask_ipv4(mapped, bits) == *entry.ip()),
        (SocketAddr::V6(_), SocketAddr::V4(_)) => false,
    }
}

impl fmt::Display for SenderEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.addr {
            NetAddr::Pattern(pattern) => write!(f, "{pattern}"),
            NetAddr::Network { addr, bits } => match addr {
                SocketAddr::V6(v6) if v6.scope_id() != 0 => {
                    write!(f, "{}%{}/{bits}", v6.ip(), v6.scope_id())
                }
                _ => write!(f, "{}/{bits}", addr.ip()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    fn peer(text: &str) -> SockAddr {
        let ip: IpAddr = text.parse().expect("literal address");
        SockAddr::from(SocketAddr::new(ip, 514))
    }

    fn scoped_peer(text: &str, scope_id: u32) -> SockAddr {
        let ip: Ipv6Addr = text.parse().expect("literal address");
        SockAddr::from(SocketAddrV6::new(ip, 514, 0, scope_id))
    }

    #[test]
    fn ipv4_network_matches_masked_source() {
        let entry = SenderEntry::ipv4(Ipv4Addr::new(192, 168, 1, 77), 24);
        assert!(entry.matches(&peer("192.168.1.200"), None));
        assert!(!entry.matches(&peer("192.168.2.1"), None));
        assert_eq!(entry.to_string(), "192.168.1.0/24");
    }

    #[test]
    fn ipv4_network_matches_mapped_ipv6_source() {
        let entry = SenderEntry::ipv4(Ipv4Addr::new(192, 168, 1, 0), 24);
        assert!(entry.matches(&peer("::ffff:192.168.1.5"), None));
        assert!(!entry.matches(&peer("::ffff:192.168.9.5"), None));
        assert!(!entry.matches(&peer("2001:db8::c0a8:105"), None));
    }

    #[test]
    fn ipv6_network_never_matches_ipv4_source() {
        let entry = SenderEntry::ipv6(Ipv6Addr::UNSPECIFIED, 0, 1);
        assert!(!entry.matches(&peer("10.0.0.1"), None));
        assert!(entry.matches(&peer("::1"), None));
    }

    #[test]
    fn ipv6_scope_is_checked_only_when_configured() {
        let unscoped = SenderEntry::ipv6("fe80::".parse().expect("v6"), 0, 64);
        assert!(unscoped.matches(&scoped_peer("fe80::1", 3), None));
        assert!(unscoped.matches(&scoped_peer("fe80::1", 0), None));

        let scoped = SenderEntry::ipv6("fe80::".parse().expect("v6"), 2, 64);
        assert!(scoped.matches(&scoped_peer("fe80::1", 2), None));
        assert!(!scoped.matches(&scoped_peer("fe80::1", 3), None));
        assert!(!scoped.matches(&scoped_peer("fe80::1", 0), None));
        assert_eq!(scoped.to_string(), "fe80::%2/64");
    }

    #[test]
    fn pattern_requires_a_hostname() {
        let entry = SenderEntry::pattern("*.example.com");
        let source = peer("192.0.2.1");
        assert!(entry.matches(&source, Some("a.example.com")));
        assert!(!entry.matches(&source, Some("")));
        assert!(!entry.matches(&source, None));
        assert_eq!(entry.bits(), None);
        assert_eq!(entry.to_string(), "*.example.com");
    }

    #[test]
    fn network_entry_ignores_hostname() {
        let entry = SenderEntry::ipv4(Ipv4Addr::new(10, 0, 0, 0), 8);
        assert!(!entry.matches(&peer("172.16.0.1"), Some("10.0.0.1")));
        assert_eq!(entry.bits(), Some(8));
        assert!(entry.host_pattern().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn non_inet_peer_never_matches_network_entry() {
        let entry = SenderEntry::ipv4(Ipv4Addr::UNSPECIFIED, 1);
        let unix = SockAddr::unix("/tmp/syslog.sock").expect("unix socket address");
        assert!(!entry.matches(&unix, None));
        assert!(SenderEntry::pattern("*").matches(&unix, Some("local")));
    }
}
