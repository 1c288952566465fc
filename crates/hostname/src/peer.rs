use std::net::IpAddr;

/// Placeholder name for a peer whose address could not be rendered.
pub const INVALID_SOURCE_NAME: &str = "???";

/// How a [`PeerHost`] name was obtained.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ResolveOutcome {
    /// A name was obtained, or a forged PTR record was replaced by the address.
    Ok,
    /// The source address was malformed; the name is [`INVALID_SOURCE_NAME`].
    InvalidSource,
    /// DNS is disabled or the reverse lookup failed; the name is the address.
    AddressUnknown,
}

/// How far a [`PeerHost`] name can be trusted.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Trust {
    /// Name from a PTR record that passed the forgery check.
    Verified,
    /// The PTR record named an address literal and the address is used instead.
    ForgedPtr {
        /// Name published in the forged PTR record.
        ptr_name: String,
    },
    /// The name is the numeric address.
    Numeric,
    /// The source address was malformed.
    Invalid,
}

/// Resolved identity of a peer.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PeerHost {
    host: String,
    fqdn: String,
    outcome: ResolveOutcome,
    trust: Trust,
}

impl PeerHost {
    pub(crate) fn verified(host: String, fqdn: String) -> Self {
        Self {
            host,
            fqdn,
            outcome: ResolveOutcome::Ok,
            trust: Trust::Verified,
        }
    }

    pub(crate) fn forged(ip: IpAddr, ptr_name: String) -> Self {
        let numeric = ip.to_string();
        Self {
            host: numeric.clone(),
            fqdn: numeric,
            outcome: ResolveOutcome::Ok,
            trust: Trust::ForgedPtr { ptr_name },
        }
    }

    pub(crate) fn numeric(ip: IpAddr) -> Self {
        let numeric = ip.to_string();
        Self {
            host: numeric.clone(),
            fqdn: numeric,
            outcome: ResolveOutcome::AddressUnknown,
            trust: Trust::Numeric,
        }
    }

    pub(crate) fn invalid() -> Self {
        Self {
            host: INVALID_SOURCE_NAME.to_owned(),
            fqdn: INVALID_SOURCE_NAME.to_owned(),
            outcome: ResolveOutcome::InvalidSource,
            trust: Trust::Invalid,
        }
    }

    /// Short name after local-domain and strip-list processing.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Lower-cased, unshortened name.
    #[must_use]
    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    /// How the name was obtained.
    #[must_use]
    pub const fn outcome(&self) -> ResolveOutcome {
        self.outcome
    }

    /// How far the name can be trusted.
    #[must_use]
    pub const fn trust(&self) -> &Trust {
        &self.trust
    }

    /// The fully qualified name if it came from a verified PTR record.
    ///
    /// Only this name may be matched against hostname patterns.
    #[must_use]
    pub fn verified_name(&self) -> Option<&str> {
        matches!(self.trust, Trust::Verified).then_some(self.fqdn.as_str())
    }
}
