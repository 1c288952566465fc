#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `receiver` ties the allowed-sender lists and peer naming together for a
//! syslog receiver. [`ReceiverConfig`] is loaded from the `$AllowedSender`,
//! `$ACL…`, `$DisableDNS`, `$DropMsgsWithMaliciousDnsPTRRecords`,
//! `$LocalDomain`, `$StripDomains` and `$LocalHosts` directives.
//! [`Gatekeeper`] decides for each inbound peer whether its messages are
//! accepted.
//!
//! # Design
//!
//! - The active configuration lives in an [`arc_swap::ArcSwap`]. A decision
//!   loads one snapshot and uses it throughout, so lists are never changed
//!   under a running traversal.
//! - [`Gatekeeper::reload`] takes the [`hostname::ReloadBarrier`] exclusively
//!   before publishing, so it waits for reverse lookups in flight.
//! - Rules that fail individually are logged and skipped while loading. Only
//!   unreadable files, unknown directives, malformed values and allocation
//!   failures produce a [`ConfigError`].
//!
//! # Examples
//!
//! ```
//! use acl::Protocol;
//! use hostname::NamingOptions;
//! use logging::MemorySink;
//! use receiver::{Gatekeeper, ReceiverConfig};
//! use socket2::SockAddr;
//! use std::net::SocketAddr;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let dns = Arc::new(dns::SystemResolver::new());
//! let sink = Arc::new(MemorySink::new());
//! let config = ReceiverConfig::with_naming(NamingOptions::default())
//!     .apply(
//!         "$DisableDNS on\n$AllowedSender UDP, 192.0.2.0/24\n",
//!         Path::new("example.conf"),
//!         dns.as_ref(),
//!         sink.as_ref(),
//!     )
//!     .unwrap();
//!
//! let gatekeeper = Gatekeeper::new(config, dns, sink);
//! let inside = SockAddr::from("192.0.2.9:514".parse::<SocketAddr>().unwrap());
//! let outside = SockAddr::from("198.51.100.9:514".parse::<SocketAddr>().unwrap());
//! assert!(gatekeeper.admit(Protocol::Udp, &inside).is_accepted());
//! assert!(!gatekeeper.admit(Protocol::Udp, &outside).is_accepted());
//! assert!(gatekeeper.admit(Protocol::Tcp, &outside).is_accepted());
//! ```

mod config;
mod error;
mod gatekeeper;

pub use config::ReceiverConfig;
pub use error::ConfigError;
pub use gatekeeper::{Admission, Gatekeeper};
