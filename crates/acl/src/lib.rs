#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `acl` decides which peers may submit syslog messages. Each transport has a
//! [`SenderList`]: an ordered, append-only sequence of [`SenderEntry`] values,
//! each either a masked network prefix or a hostname wildcard. An empty list
//! places no restriction on senders.
//!
//! # Design
//!
//! - [`ListBuilder`] turns configuration rules into entries. Network prefixes
//!   are masked once at build time ([`mask_ipv4`], [`mask_ipv6`]). Hostnames
//!   without wildcards are resolved through a [`dns::Resolver`] and stored as
//!   host addresses, with IPv4-mapped IPv6 answers stored as IPv4.
//! - [`SenderList::permits`] evaluates entries in insertion order and stops at
//!   the first match. An IPv4 entry also covers the IPv4-mapped IPv6 form of
//!   its addresses. Pattern entries only see the peer's verified hostname.
//! - [`SenderTokenizer`] and [`add_allowed_sender_line`] implement the
//!   `$AllowedSender` configuration line. [`AllowedSenders`] keeps one list per
//!   [`Protocol`] and renders the operator listing.
//! - Errors are reported as [`AclError`]. Only
//!   [`AclError::OutOfMemory`] stops a configuration batch; every other
//!   failure skips a single rule. Each adjusted or rejected rule is reported
//!   through a [`logging::DiagnosticSink`].
//!
//! # Invariants
//!
//! - Stored network addresses have every bit below the prefix length cleared
//!   and a zero port.
//! - Network prefixes are never zero. A zero prefix would match every system
//!   and is rejected instead of being added.
//! - Entries are immutable once appended, so a finished list can be shared
//!   between threads without locking.
//!
//! # Examples
//!
//! ```
//! use acl::{AclOptions, ListBuilder, SenderList, SenderTarget};
//! use dns::SystemResolver;
//! use logging::MemorySink;
//! use socket2::SockAddr;
//! use std::net::SocketAddr;
//!
//! let sink = MemorySink::new();
//! let dns = SystemResolver::new();
//! let builder = ListBuilder::new(AclOptions::default(), &dns, &sink);
//!
//! let mut list = SenderList::new();
//! let network: SocketAddr = "192.168.1.0:0".parse().unwrap();
//! builder
//!     .add_allowed_sender(&mut list, &SenderTarget::from(network), 24)
//!     .unwrap();
//!
//! let peer = SockAddr::from("192.168.1.200:514".parse::<SocketAddr>().unwrap());
//! assert!(list.permits(&peer, None));
//! let stranger = SockAddr::from("192.168.2.1:514".parse::<SocketAddr>().unwrap());
//! assert!(!list.permits(&stranger, None));
//! ```

mod builder;
mod directive;
mod entry;
mod error;
mod list;
mod mask;
mod pattern;
mod registry;

pub use builder::{AclOptions, AddOutcome, ListBuilder, SenderTarget};
pub use directive::{SenderTokenizer, add_allowed_sender_line, parse_sender_token};
pub use entry::{NetAddr, SenderEntry};
pub use error::{AclError, AclResult};
pub use list::SenderList;
pub use mask::{IPV4_MAX_BITS, IPV6_MAX_BITS, mask_ipv4, mask_ipv6};
pub use pattern::HostPattern;
pub use registry::{AllowedSenders, Protocol};
