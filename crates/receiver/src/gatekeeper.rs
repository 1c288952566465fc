use std::sync::Arc;

use acl::Protocol;
use arc_swap::ArcSwap;
use dns::Resolver;
use hostname::{HostnameResolver, PeerHost, ReloadBarrier, ResolveError};
use logging::{DiagnosticSink, targets};
use socket2::SockAddr;

use crate::config::ReceiverConfig;

/// Verdict for one inbound message.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Admission {
    /// The sender is allowed. Carries the name to record for the message.
    Accepted(PeerHost),
    /// The sender is not on the protocol's allowed-sender list.
    Denied(PeerHost),
    /// The peer's name is forged and forged names are dropped.
    Dropped(ResolveError),
}

impl Admission {
    /// Returns `true` for [`Admission::Accepted`].
    #[must_use]
    pub const fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Resolved peer, unless the message was dropped.
    #[must_use]
    pub const fn peer(&self) -> Option<&PeerHost> {
        match self {
            Self::Accepted(peer) | Self::Denied(peer) => Some(peer),
            Self::Dropped(_) => None,
        }
    }
}

/// Admission decisions over a reloadable configuration.
///
/// Each decision runs against the configuration snapshot that was active when
/// it started. [`Gatekeeper::reload`] publishes a new snapshot once every
/// in-flight DNS round trip has finished.
pub struct Gatekeeper {
    active: ArcSwap<ReceiverConfig>,
    resolver: HostnameResolver,
    sink: Arc<dyn DiagnosticSink>,
}

impl Gatekeeper {
    /// Creates a gatekeeper serving `config`.
    #[must_use]
    pub fn new(
        config: ReceiverConfig,
        dns: Arc<dyn Resolver>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let resolver = HostnameResolver::new(dns, Arc::new(ReloadBarrier::new()), Arc::clone(&sink));
        Self {
            active: ArcSwap::from_pointee(config),
            resolver,
            sink,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ReceiverConfig> {
        self.active.load_full()
    }

    /// Replaces the active configuration.
    ///
    /// Waits for in-flight peer lookups. Decisions already holding the
    /// previous snapshot finish against it.
    pub fn reload(&self, config: ReceiverConfig) {
        let _exclusive = self.resolver.barrier().exclusive();
        self.active.store(Arc::new(config));
        self.sink.info(targets::CONFIG, "configuration reloaded".to_owned());
    }

    /// Decides whether a message from `peer` over `protocol` is accepted.
    pub fn admit(&self, protocol: Protocol, peer: &SockAddr) -> Admission {
        let config = self.snapshot();
        let host = match self.resolver.resolve(peer, config.naming()) {
            Ok(host) => host,
            Err(error) => return Admission::Dropped(error),
        };

        if config
            .senders()
            .list(protocol)
            .permits(peer, host.verified_name())
        {
            Admission::Accepted(host)
        } else {
            self.sink.warning(
                targets::ACL,
                format!(
                    "{protocol} message from disallowed sender {} discarded",
                    host.host()
                ),
            );
            Admission::Denied(host)
        }
    }
}

impl std::fmt::Debug for Gatekeeper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gatekeeper")
            .field("active", &self.active)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
