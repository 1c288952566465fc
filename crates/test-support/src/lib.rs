#![deny(unsafe_code)]

//! Shared test utilities for the allowed-senders workspace.
//!
//! [`StubResolver`] is a scripted [`dns::Resolver`] whose answers are fixed at
//! construction and whose calls are counted, so tests can assert both on the
//! outcome of a decision and on whether the name service was consulted.
//! [`config_file`] writes a configuration snippet to a temporary file.

use std::collections::HashMap;
use std::io::{self, Write};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};

use tempfile::NamedTempFile;

/// Scripted name service.
///
/// Hostnames are matched case-insensitively. Names without an answer fail
/// with [`io::ErrorKind::NotFound`].
#[derive(Debug, Default)]
pub struct StubResolver {
    hosts: HashMap<String, Vec<IpAddr>>,
    pointers: HashMap<IpAddr, String>,
    numeric: HashMap<String, IpAddr>,
    host_lookups: AtomicUsize,
    reverse_lookups: AtomicUsize,
    numeric_lookups: AtomicUsize,
}

impl StubResolver {
    /// Creates a resolver with no answers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers forward lookups of `name` with `addresses`.
    #[must_use]
    pub fn with_host<I>(mut self, name: &str, addresses: I) -> Self
    where
        I: IntoIterator<Item = IpAddr>,
    {
        self.hosts
            .insert(name.to_ascii_lowercase(), addresses.into_iter().collect());
        self
    }

    /// Answers reverse lookups of `addr` with `name`.
    #[must_use]
    pub fn with_ptr(mut self, addr: IpAddr, name: &str) -> Self {
        self.pointers.insert(addr, name.to_owned());
        self
    }

    /// Makes the numeric-only lookup of `name` succeed even if it is not a literal.
    #[must_use]
    pub fn with_numeric(mut self, name: &str, addr: IpAddr) -> Self {
        self.numeric.insert(name.to_owned(), addr);
        self
    }

    /// Number of forward lookups performed.
    pub fn host_lookups(&self) -> usize {
        self.host_lookups.load(Ordering::SeqCst)
    }

    /// Number of reverse lookups performed.
    pub fn reverse_lookups(&self) -> usize {
        self.reverse_lookups.load(Ordering::SeqCst)
    }

    /// Number of numeric-only lookups performed.
    pub fn numeric_lookups(&self) -> usize {
        self.numeric_lookups.load(Ordering::SeqCst)
    }
}

impl dns::Resolver for StubResolver {
    fn lookup_host(&self, hostname: &str) -> io::Result<Vec<IpAddr>> {
        self.host_lookups.fetch_add(1, Ordering::SeqCst);
        self.hosts
            .get(&hostname.to_ascii_lowercase())
            .cloned()
            .ok_or_else(|| not_found(hostname))
    }

    fn lookup_addr(&self, addr: &SocketAddr) -> io::Result<String> {
        self.reverse_lookups.fetch_add(1, Ordering::SeqCst);
        self.pointers
            .get(&addr.ip())
            .cloned()
            .ok_or_else(|| not_found(&addr.ip().to_string()))
    }

    fn lookup_numeric(&self, name: &str) -> Option<IpAddr> {
        self.numeric_lookups.fetch_add(1, Ordering::SeqCst);
        self.numeric
            .get(name)
            .copied()
            .or_else(|| dns::parse_numeric_host(name))
    }
}

fn not_found(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("no answer for {what}"))
}

/// Writes `contents` to a fresh temporary file.
pub fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temporary config file");
    file.write_all(contents.as_bytes())
        .expect("write temporary config file");
    file.flush().expect("flush temporary config file");
    file
}
