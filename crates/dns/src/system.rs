use std::io;
use std::net::{IpAddr, SocketAddr};

use dns_lookup::{AddrInfoHints, get_hostname, getaddrinfo, getnameinfo};

use crate::Resolver;

#[cfg(unix)]
mod flags {
    pub(super) const NAME_REQUIRED: i32 = libc::NI_NAMEREQD;
    pub(super) const NUMERIC_HOST: i32 = libc::AI_NUMERICHOST;
    pub(super) const ADDRESS_CONFIGURED: i32 = libc::AI_ADDRCONFIG;
    pub(super) const DATAGRAM: i32 = libc::SOCK_DGRAM;
}

// Values shared by the Winsock and POSIX headers.
#[cfg(not(unix))]
mod flags {
    pub(super) const NAME_REQUIRED: i32 = 0x04;
    pub(super) const NUMERIC_HOST: i32 = 0x04;
    pub(super) const ADDRESS_CONFIGURED: i32 = 0x0400;
    pub(super) const DATAGRAM: i32 = 2;
}

/// [`Resolver`] backed by the operating system's name service.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemResolver;

impl SystemResolver {
    /// Creates the resolver.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn addrinfo(host: &str, flags: i32) -> io::Result<Vec<IpAddr>> {
        let hints = AddrInfoHints {
            socktype: flags::DATAGRAM,
            flags,
            ..AddrInfoHints::default()
        };

        let mut addresses = Vec::new();
        for info in getaddrinfo(Some(host), None, Some(hints)).map_err(io::Error::from)? {
            let ip = info?.sockaddr.ip();
            if !addresses.contains(&ip) {
                addresses.push(ip);
            }
        }
        Ok(addresses)
    }
}

impl Resolver for SystemResolver {
    fn lookup_host(&self, hostname: &str) -> io::Result<Vec<IpAddr>> {
        Self::addrinfo(hostname, flags::ADDRESS_CONFIGURED)
    }

    fn lookup_addr(&self, addr: &SocketAddr) -> io::Result<String> {
        getnameinfo(addr, flags::NAME_REQUIRED)
            .map(|(host, _service)| host)
            .map_err(io::Error::from)
    }

    fn lookup_numeric(&self, name: &str) -> Option<IpAddr> {
        Self::addrinfo(name, flags::NUMERIC_HOST)
            .ok()
            .and_then(|addresses| addresses.first().copied())
    }
}

/// Returns this machine's hostname as reported by the operating system.
///
/// # Errors
///
/// Propagates the operating system error when the name is unavailable.
pub fn system_hostname() -> io::Result<String> {
    get_hostname()
}
