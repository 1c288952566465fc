#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `hostname` names the peer of an inbound syslog message. The name is
//! matched against hostname patterns in allowed-sender lists and recorded as
//! the message source, so it must not be under the control of whoever owns
//! the peer's reverse DNS zone.
//!
//! # Design
//!
//! [`HostnameResolver::resolve`] performs these steps:
//!
//! 1. Render the peer address. Non-inet sources yield the `???` placeholder
//!    with [`ResolveOutcome::InvalidSource`].
//! 2. With DNS disabled, name the peer by its address
//!    ([`ResolveOutcome::AddressUnknown`]).
//! 3. Look up the PTR record while holding a [`ReloadDeferral`]. A failed
//!    lookup also yields the address.
//! 4. Check that the PTR name is not an address literal. A forged record is
//!    rejected with [`ResolveError::MaliciousEntity`] or replaced by the
//!    address, per [`NamingOptions::drop_malicious_ptr`].
//! 5. Lower-case the name, drop a trailing dot, and shorten it with
//!    [`NamingOptions::shorten`].
//!
//! The [`Trust`] attached to each [`PeerHost`] records which path was taken.
//! Only [`Trust::Verified`] names are returned by
//! [`PeerHost::verified_name`].
//!
//! # Invariants
//!
//! - The reload deferral is released on every exit path, including panics in
//!   the name service.
//! - Every rejected or degraded lookup is reported through the
//!   [`logging::DiagnosticSink`] with the peer address.
//!
//! # Examples
//!
//! ```
//! use hostname::{HostnameResolver, NamingOptions, ReloadBarrier, ResolveOutcome};
//! use logging::MemorySink;
//! use socket2::SockAddr;
//! use std::net::SocketAddr;
//! use std::sync::Arc;
//!
//! let resolver = HostnameResolver::new(
//!     Arc::new(dns::SystemResolver::new()),
//!     Arc::new(ReloadBarrier::new()),
//!     Arc::new(MemorySink::new()),
//! );
//! let options = NamingOptions {
//!     dns_enabled: false,
//!     ..NamingOptions::default()
//! };
//!
//! let peer = SockAddr::from("192.0.2.44:514".parse::<SocketAddr>().unwrap());
//! let host = resolver.resolve(&peer, &options).unwrap();
//! assert_eq!(host.host(), "192.0.2.44");
//! assert_eq!(host.outcome(), ResolveOutcome::AddressUnknown);
//! assert_eq!(host.verified_name(), None);
//! ```

mod barrier;
mod error;
mod options;
mod peer;
mod resolver;

pub use barrier::{ReloadBarrier, ReloadDeferral, ReloadExclusive};
pub use error::ResolveError;
pub use options::NamingOptions;
pub use peer::{INVALID_SOURCE_NAME, PeerHost, ResolveOutcome, Trust};
pub use resolver::{HostnameResolver, MAX_HOSTNAME_LEN};
