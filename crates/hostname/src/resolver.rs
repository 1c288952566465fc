use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use dns::Resolver;
use logging::{DiagnosticSink, targets};
use socket2::SockAddr;

use crate::barrier::ReloadBarrier;
use crate::error::ResolveError;
use crate::options::NamingOptions;
use crate::peer::PeerHost;

/// Longest name accepted from a reverse lookup, `NI_MAXHOST - 1`.
pub const MAX_HOSTNAME_LEN: usize = 1024;

enum Pointer {
    Missing,
    Genuine(String),
    Forged(String),
}

/// Turns peer socket addresses into trustworthy names.
///
/// A name from a PTR record is only used when it is not itself an address
/// literal. Such a forged record is either rejected or replaced by the peer's
/// address, per [`NamingOptions::drop_malicious_ptr`]. Every lookup holds a
/// [`ReloadBarrier`] deferral for the reverse and confirmation round trip.
#[derive(Clone)]
pub struct HostnameResolver {
    dns: Arc<dyn Resolver>,
    barrier: Arc<ReloadBarrier>,
    sink: Arc<dyn DiagnosticSink>,
}

impl HostnameResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(
        dns: Arc<dyn Resolver>,
        barrier: Arc<ReloadBarrier>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self { dns, barrier, sink }
    }

    /// Barrier taken around every DNS round trip.
    #[must_use]
    pub const fn barrier(&self) -> &Arc<ReloadBarrier> {
        &self.barrier
    }

    /// Resolves `peer` to a name.
    ///
    /// Degraded results are not errors: a malformed source yields
    /// [`ResolveOutcome::InvalidSource`](crate::ResolveOutcome::InvalidSource)
    /// and a disabled or failed lookup yields the numeric address with
    /// [`ResolveOutcome::AddressUnknown`](crate::ResolveOutcome::AddressUnknown).
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MaliciousEntity`] when the PTR record names an
    /// address literal and [`NamingOptions::drop_malicious_ptr`] is set.
    pub fn resolve(
        &self,
        peer: &SockAddr,
        options: &NamingOptions,
    ) -> Result<PeerHost, ResolveError> {
        let Some(socket) = peer.as_socket() else {
            self.sink.debug(
                targets::DNS,
                format!(
                    "Malformed from address, address family {} is not supported",
                    peer.family()
                ),
            );
            return Ok(PeerHost::invalid());
        };
        let ip = socket.ip();

        if !options.dns_enabled {
            return Ok(self.unknown(ip));
        }

        let pointer = {
            let _deferral = self.barrier.defer_reload();
            self.lookup_pointer(&socket)
        };

        match pointer {
            Pointer::Missing => Ok(self.unknown(ip)),
            Pointer::Forged(ptr_name) if options.drop_malicious_ptr => {
                self.sink.error(
                    targets::DNS,
                    format!("Malicious PTR record, message dropped IP = \"{ip}\" HOST = \"{ptr_name}\""),
                );
                Err(ResolveError::MaliciousEntity { ip, ptr_name })
            }
            Pointer::Forged(ptr_name) => {
                self.sink.error(
                    targets::DNS,
                    format!(
                        "Malicious PTR record (message accepted, but used IP instead of PTR name: \
                         IP = \"{ip}\" HOST = \"{ptr_name}\""
                    ),
                );
                Ok(PeerHost::forged(ip, ptr_name))
            }
            Pointer::Genuine(fqdn) => {
                let host = options.shorten(&fqdn).to_owned();
                Ok(PeerHost::verified(host, fqdn))
            }
        }
    }

    fn lookup_pointer(&self, socket: &SocketAddr) -> Pointer {
        let name = match self.dns.lookup_addr(socket) {
            Ok(name) => name,
            Err(error) => {
                self.sink.debug(
                    targets::DNS,
                    format!("Reverse lookup of {} failed: {error}", socket.ip()),
                );
                return Pointer::Missing;
            }
        };

        if name.len() > MAX_HOSTNAME_LEN {
            self.sink.debug(
                targets::DNS,
                format!("Reverse lookup of {} returned an overlong name", socket.ip()),
            );
            return Pointer::Missing;
        }

        let fqdn = normalize_hostname_owned(name.clone());
        if fqdn.is_empty() {
            return Pointer::Missing;
        }

        // A PTR record must name a host. One that parses as an address, with or
        // without a trailing dot, was forged.
        if self.dns.lookup_numeric(&fqdn).is_some() {
            return Pointer::Forged(name);
        }
        Pointer::Genuine(fqdn)
    }

    fn unknown(&self, ip: IpAddr) -> PeerHost {
        self.sink.debug(
            targets::DNS,
            format!("Host name for your address ({ip}) unknown"),
        );
        PeerHost::numeric(ip)
    }
}

impl std::fmt::Debug for HostnameResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostnameResolver")
            .field("barrier", &self.barrier)
            .finish_non_exhaustive()
    }
}

fn normalize_hostname_owned(mut name: String) -> String {
    if name.ends_with('.') {
        name.pop();
    }
    name.make_ascii_lowercase();
    name
}
