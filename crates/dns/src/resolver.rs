use std::io;
use std::net::{IpAddr, SocketAddr};

use crate::parse_numeric_host;

/// Name-service operations consumed by the access-control crates.
///
/// Implementations must be callable from several threads at once. All calls
/// are blocking.
pub trait Resolver: Send + Sync {
    /// Resolves `hostname` to all of its addresses, any family.
    ///
    /// An empty vector is a valid answer and is treated by callers like a
    /// failed lookup.
    fn lookup_host(&self, hostname: &str) -> io::Result<Vec<IpAddr>>;

    /// Resolves `addr` to the name published in its PTR record.
    ///
    /// Fails when no name is available; implementations must not fall back to
    /// the numeric form.
    fn lookup_addr(&self, addr: &SocketAddr) -> io::Result<String>;

    /// Interprets `name` as a numeric address without any network access.
    ///
    /// Returns `Some` when `name` is an address literal.
    fn lookup_numeric(&self, name: &str) -> Option<IpAddr> {
        parse_numeric_host(name)
    }
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn lookup_host(&self, hostname: &str) -> io::Result<Vec<IpAddr>> {
        (**self).lookup_host(hostname)
    }

    fn lookup_addr(&self, addr: &SocketAddr) -> io::Result<String> {
        (**self).lookup_addr(addr)
    }

    fn lookup_numeric(&self, name: &str) -> Option<IpAddr> {
        (**self).lookup_numeric(name)
    }
}

impl<R: Resolver + ?Sized> Resolver for std::sync::Arc<R> {
    fn lookup_host(&self, hostname: &str) -> io::Result<Vec<IpAddr>> {
        (**self).lookup_host(hostname)
    }

    fn lookup_addr(&self, addr: &SocketAddr) -> io::Result<String> {
        (**self).lookup_addr(addr)
    }

    fn lookup_numeric(&self, name: &str) -> Option<IpAddr> {
        (**self).lookup_numeric(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;
    use std::sync::Arc;

    struct Fixed;

    impl Resolver for Fixed {
        fn lookup_host(&self, _hostname: &str) -> io::Result<Vec<IpAddr>> {
            Ok(vec![IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1))])
        }

        fn lookup_addr(&self, _addr: &SocketAddr) -> io::Result<String> {
            Err(io::Error::new(io::ErrorKind::NotFound, "no PTR"))
        }
    }

    #[test]
    fn default_numeric_lookup_parses_literals() {
        assert_eq!(
            Fixed.lookup_numeric("192.0.2.7"),
            Some(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 7)))
        );
        assert_eq!(Fixed.lookup_numeric("host.example"), None);
    }

    #[test]
    fn references_and_arcs_forward() {
        let shared: Arc<dyn Resolver> = Arc::new(Fixed);
        let by_ref = &Fixed;
        assert_eq!(shared.lookup_host("x").expect("lookup").len(), 1);
        assert_eq!(by_ref.lookup_host("x").expect("lookup").len(), 1);
        let peer = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        assert!(shared.lookup_addr(&peer).is_err());
    }
}
