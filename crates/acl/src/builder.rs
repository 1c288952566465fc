use std::fmt;
use std::net::{IpAddr, SocketAddr};

use dns::Resolver;
use logging::{DiagnosticSink, targets};
use socket2::SockAddr;

use crate::entry::SenderEntry;
use crate::error::{AclError, AclResult};
use crate::list::SenderList;
use crate::mask::{IPV4_MAX_BITS, IPV6_MAX_BITS};
use crate::pattern::contains_wildcard;

/// Flags controlling how allowed-sender rules are expanded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AclOptions {
    /// Hostname rules are ignored entirely when DNS is disabled.
    pub dns_enabled: bool,
    /// Keep a hostname that failed to resolve as a pattern entry.
    pub add_hostname_on_failure: bool,
    /// Resolve wildcard-free hostnames into address entries.
    pub resolve_hostnames: bool,
}

impl Default for AclOptions {
    fn default() -> Self {
        Self {
            dns_enabled: true,
            add_hostname_on_failure: false,
            resolve_hostnames: true,
        }
    }
}

/// Sender as written in a rule, before expansion.
#[derive(Clone, Debug)]
pub enum SenderTarget {
    /// Raw socket address. Families other than IPv4 and IPv6 are rejected.
    Address(SockAddr),
    /// Hostname or hostname wildcard.
    Hostname(String),
}

impl From<SocketAddr> for SenderTarget {
    fn from(addr: SocketAddr) -> Self {
        Self::Address(SockAddr::from(addr))
    }
}

impl From<IpAddr> for SenderTarget {
    fn from(ip: IpAddr) -> Self {
        Self::from(SocketAddr::new(ip, 0))
    }
}

impl fmt::Display for SenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hostname(name) => f.write_str(name),
            Self::Address(addr) => match addr.as_socket() {
                Some(SocketAddr::V6(v6)) if v6.scope_id() != 0 => {
                    write!(f, "{}%{}", v6.ip(), v6.scope_id())
                }
                Some(socket) => write!(f, "{}", socket.ip()),
                None => write!(f, "<address family {}>", addr.family()),
            },
        }
    }
}

/// Result of a successful [`ListBuilder::add_allowed_sender`] call.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddOutcome {
    /// This many entries were appended.
    Added(usize),
    /// The rule was skipped by configuration and nothing was appended.
    Ignored,
}

/// Expands allowed-sender rules into list entries.
///
/// Hostnames without wildcards are resolved through the [`Resolver`] at build
/// time and stored as host addresses. Every adjusted or rejected rule is
/// reported to the [`DiagnosticSink`].
pub struct ListBuilder<'a> {
    options: AclOptions,
    dns: &'a dyn Resolver,
    sink: &'a dyn DiagnosticSink,
}

impl<'a> ListBuilder<'a> {
    /// Creates a builder.
    #[must_use]
    pub fn new(options: AclOptions, dns: &'a dyn Resolver, sink: &'a dyn DiagnosticSink) -> Self {
        Self { options, dns, sink }
    }

    /// Returns the expansion flags.
    #[must_use]
    pub const fn options(&self) -> AclOptions {
        self.options
    }

    pub(crate) fn sink(&self) -> &'a dyn DiagnosticSink {
        self.sink
    }

    /// Appends the entries described by `target` to `list`.
    ///
    /// For an address, `bits` is the prefix length. Zero is rejected since it
    /// would match every system; values above the family maximum are clamped
    /// to 32 or 128. `bits` is ignored for hostnames.
    ///
    /// # Errors
    ///
    /// - [`AclError::OutOfMemory`] if the list cannot grow. Entries appended
    ///   before the failure stay in the list.
    /// - [`AclError::InvalidInput`] for a zero prefix length.
    /// - [`AclError::InvalidAddressFamily`] for a non-inet address.
    /// - [`AclError::NoEntry`] if a hostname did not resolve and
    ///   [`AclOptions::add_hostname_on_failure`] is off.
    pub fn add_allowed_sender(
        &self,
        list: &mut SenderList,
        target: &SenderTarget,
        bits: u8,
    ) -> AclResult<AddOutcome> {
        match target {
            SenderTarget::Address(addr) => self.add_address(list, addr, bits),
            SenderTarget::Hostname(name) => self.add_hostname(list, name),
        }
    }

    fn add_address(&self, list: &mut SenderList, addr: &SockAddr, bits: u8) -> AclResult<AddOutcome> {
        let Some(socket) = addr.as_socket() else {
            let family = i32::from(addr.family());
            self.sink.error(
                targets::ACL,
                format!("Internal error caused AllowedSender to be ignored, AF = {family}"),
            );
            return Err(AclError::InvalidAddressFamily { family });
        };

        if bits == 0 {
            self.sink.error(
                targets::ACL,
                format!(
                    "You can not specify 0 bits of the netmask, this would match ALL systems. \
                     If you really intend to do that, remove all $AllowedSender directives. \
                     Entry {} ignored.",
                    socket.ip()
                ),
            );
            return Err(AclError::invalid(
                format!("{}/0", socket.ip()),
                "prefix length 0 would match all systems",
            ));
        }

        let entry = match socket {
            SocketAddr::V4(v4) => {
                let bits = self.clamp(bits, IPV4_MAX_BITS, "IPv4");
                SenderEntry::ipv4(*v4.ip(), bits)
            }
            SocketAddr::V6(v6) => {
                let bits = self.clamp(bits, IPV6_MAX_BITS, "IPv6");
                SenderEntry::ipv6(*v6.ip(), v6.scope_id(), bits)
            }
        };
        list.append(entry)?;
        Ok(AddOutcome::Added(1))
    }

    fn clamp(&self, bits: u8, max: u8, family: &str) -> u8 {
        if bits <= max {
            return bits;
        }
        self.sink.warning(
            targets::ACL,
            format!("Invalid bit number {bits} in {family} address - adjusted to {max}"),
        );
        max
    }

    fn add_hostname(&self, list: &mut SenderList, hostname: &str) -> AclResult<AddOutcome> {
        if !self.options.dns_enabled {
            self.sink.warning(
                targets::ACL,
                format!("Ignoring hostname based ACLs because DNS is disabled. Entry \"{hostname}\" skipped."),
            );
            return Ok(AddOutcome::Ignored);
        }

        if contains_wildcard(hostname) || !self.options.resolve_hostnames {
            list.append(SenderEntry::pattern(hostname))?;
            return Ok(AddOutcome::Added(1));
        }

        let addresses = match self.dns.lookup_host(hostname) {
            Ok(addresses) if !addresses.is_empty() => addresses,
            Ok(_) => return self.unresolved(list, hostname, "no addresses"),
            Err(error) => return self.unresolved(list, hostname, &error.to_string()),
        };

        for ip in &addresses {
            let entry = match ip {
                IpAddr::V4(v4) => SenderEntry::ipv4(*v4, IPV4_MAX_BITS),
                IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
                    Some(v4) => SenderEntry::ipv4(v4, IPV4_MAX_BITS),
                    None => SenderEntry::ipv6(*v6, 0, IPV6_MAX_BITS),
                },
            };
            list.append(entry)?;
        }
        self.sink.debug(
            targets::ACL,
            format!(
                "Hostname \"{hostname}\" expanded to {} allowed sender entries.",
                addresses.len()
            ),
        );
        Ok(AddOutcome::Added(addresses.len()))
    }

    fn unresolved(&self, list: &mut SenderList, hostname: &str, reason: &str) -> AclResult<AddOutcome> {
        self.sink.error(
            targets::ACL,
            format!("DNS error: Can't resolve \"{hostname}\" ({reason})"),
        );

        if self.options.add_hostname_on_failure {
            self.sink.warning(
                targets::ACL,
                format!("Adding hostname \"{hostname}\" to ACL as a wildcard entry."),
            );
            list.append(SenderEntry::pattern(hostname))?;
            return Ok(AddOutcome::Added(1));
        }

        self.sink.error(
            targets::ACL,
            format!("Hostname \"{hostname}\" WON'T be added to ACL."),
        );
        Err(AclError::NoEntry {
            hostname: hostname.to_owned(),
        })
    }
}

impl fmt::Debug for ListBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListBuilder")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
