use std::fmt::{self, Write as _};
use std::str::FromStr;

use crate::error::AclError;
use crate::list::SenderList;

/// Transport class an allowed-sender list applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Protocol {
    /// Plain UDP syslog.
    Udp,
    /// Plain TCP syslog.
    Tcp,
    /// GSS-API authenticated TCP syslog.
    Gss,
}

impl Protocol {
    /// Every protocol, in listing order.
    pub const ALL: [Self; 3] = [Self::Udp, Self::Tcp, Self::Gss];

    /// Upper-case label used in listings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Udp => "UDP",
            Self::Tcp => "TCP",
            Self::Gss => "GSS",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Protocol {
    type Err = AclError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|protocol| protocol.label().eq_ignore_ascii_case(name))
            .ok_or_else(|| AclError::invalid(name, "unknown protocol, expected udp, tcp or gss"))
    }
}

/// One [`SenderList`] per [`Protocol`].
///
/// Lists never share entries. A configuration reload builds a fresh registry
/// instead of editing the active one.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AllowedSenders {
    udp: SenderList,
    tcp: SenderList,
    gss: SenderList,
}

impl AllowedSenders {
    /// Creates a registry with every list unrestricted.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            udp: SenderList::new(),
            tcp: SenderList::new(),
            gss: SenderList::new(),
        }
    }

    /// Returns the list for `protocol`.
    #[must_use]
    pub const fn list(&self, protocol: Protocol) -> &SenderList {
        match protocol {
            Protocol::Udp => &self.udp,
            Protocol::Tcp => &self.tcp,
            Protocol::Gss => &self.gss,
        }
    }

    /// Returns the list for `protocol` for modification.
    pub fn list_mut(&mut self, protocol: Protocol) -> &mut SenderList {
        match protocol {
            Protocol::Udp => &mut self.udp,
            Protocol::Tcp => &mut self.tcp,
            Protocol::Gss => &mut self.gss,
        }
    }

    /// Clears every list.
    pub fn clear(&mut self) {
        self.udp.clear();
        self.tcp.clear();
        self.gss.clear();
    }

    /// Renders the human-readable dump of one list.
    ///
    /// ```
    /// use acl::{AllowedSenders, Protocol};
    ///
    /// let senders = AllowedSenders::new();
    /// assert_eq!(
    ///     senders.listing(Protocol::Tcp),
    ///     "Allowed TCP Senders:\n\tNo restrictions set.\n"
    /// );
    /// ```
    #[must_use]
    pub fn listing(&self, protocol: Protocol) -> String {
        let list = self.list(protocol);
        let mut out = format!("Allowed {protocol} Senders:\n");
        if list.is_empty() {
            out.push_str("\tNo restrictions set.\n");
        }
        for entry in list {
            // Writing to a String cannot fail.
            let _ = writeln!(out, "\t{entry}");
        }
        out
    }
}
