use dns::system_hostname;

/// Naming policy applied to every peer lookup.
///
/// Domain and host names are compared without regard to ASCII case.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NamingOptions {
    /// Perform reverse lookups at all. When off, peers are named by address.
    pub dns_enabled: bool,
    /// Reject messages whose PTR record names an address literal. When off,
    /// such peers are accepted under their address.
    pub drop_malicious_ptr: bool,
    /// Domain removed from names of hosts in this domain.
    pub local_domain: String,
    /// Further domains removed from peer names.
    pub strip_domains: Vec<String>,
    /// Fully qualified names shortened to their first label.
    pub local_hosts: Vec<String>,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            dns_enabled: true,
            drop_malicious_ptr: false,
            local_domain: String::new(),
            strip_domains: Vec::new(),
            local_hosts: Vec::new(),
        }
    }
}

impl NamingOptions {
    /// Default options with the local domain taken from this machine's name.
    ///
    /// The local domain stays empty when the hostname is unavailable or has
    /// no domain part.
    #[must_use]
    pub fn from_system() -> Self {
        let local_domain = system_hostname()
            .ok()
            .and_then(|name| domain_of(&name).map(str::to_ascii_lowercase))
            .unwrap_or_default();
        Self {
            local_domain,
            ..Self::default()
        }
    }

    /// Returns the short form of `fqdn`.
    ///
    /// The name is cut at its first dot when the remainder equals the local
    /// domain or one of the strip domains, or when the whole name is one of the
    /// local hosts. Otherwise `fqdn` is returned unchanged.
    ///
    /// ```
    /// use hostname::NamingOptions;
    ///
    /// let options = NamingOptions {
    ///     local_domain: "example.com".to_owned(),
    ///     ..NamingOptions::default()
    /// };
    /// assert_eq!(options.shorten("web1.example.com"), "web1");
    /// assert_eq!(options.shorten("web1.dev.example.com"), "web1.dev.example.com");
    /// ```
    #[must_use]
    pub fn shorten<'a>(&self, fqdn: &'a str) -> &'a str {
        let Some((host, domain)) = fqdn.split_once('.') else {
            return fqdn;
        };

        let strip = domain.eq_ignore_ascii_case(&self.local_domain)
            || self
                .strip_domains
                .iter()
                .any(|candidate| domain.eq_ignore_ascii_case(candidate))
            || self
                .local_hosts
                .iter()
                .any(|candidate| fqdn.eq_ignore_ascii_case(candidate));
        if strip { host } else { fqdn }
    }
}

fn domain_of(hostname: &str) -> Option<&str> {
    hostname
        .trim_end_matches('.')
        .split_once('.')
        .map(|(_, domain)| domain)
        .filter(|domain| !domain.is_empty())
}
