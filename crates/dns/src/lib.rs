#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `dns` isolates every name-service call made by the allowed-sender and
//! peer-hostname crates behind the [`Resolver`] trait. Configuration loading
//! uses [`Resolver::lookup_host`] to expand hostname rules into addresses; the
//! peer-hostname resolver uses [`Resolver::lookup_addr`] for the PTR lookup and
//! [`Resolver::lookup_numeric`] to detect PTR records whose name is itself an
//! address literal.
//!
//! # Design
//!
//! - [`SystemResolver`] delegates to the platform `getaddrinfo`/`getnameinfo`
//!   through the `dns-lookup` crate. Reverse lookups require a name
//!   (`NI_NAMEREQD`) so a missing PTR record surfaces as an error instead of a
//!   numeric string.
//! - [`parse_numeric_host`] reproduces the `AI_NUMERICHOST` acceptance rules
//!   in pure Rust, including the legacy `inet_aton` spellings (`127.1`,
//!   `0x7f000001`). It backs the default [`Resolver::lookup_numeric`].
//! - Tests substitute scripted implementations of [`Resolver`].
//!
//! # Invariants
//!
//! - [`Resolver::lookup_numeric`] never touches the network.
//! - Addresses returned by [`Resolver::lookup_host`] keep the resolver's order
//!   with duplicates removed.
//!
//! # Examples
//!
//! ```
//! use dns::parse_numeric_host;
//! use std::net::{IpAddr, Ipv4Addr};
//!
//! assert_eq!(parse_numeric_host("127.1"), Some(IpAddr::V4(Ipv4Addr::LOCALHOST)));
//! assert_eq!(parse_numeric_host("mail.example.org"), None);
//! ```

mod numeric;
mod resolver;
mod system;

pub use numeric::parse_numeric_host;
pub use resolver::Resolver;
pub use system::{SystemResolver, system_hostname};
