//! crates/receiver/src/config.rs
//!
//! Loading of the allowed-sender and peer-naming directives.
//!
//! The file is line oriented. Blank lines and lines starting with `#` are
//! skipped. Directive names are case-insensitive and processed in order, so a
//! flag only affects the `$AllowedSender` lines that follow it:
//!
//! ```text
//! $DisableDNS off
//! $ACLAddHostnameOnFail on
//! $AllowedSender UDP, 127.0.0.1, 192.0.2.0/24, *.example.net
//! $DropMsgsWithMaliciousDnsPTRRecords on
//! $LocalDomain example.net
//! $StripDomains lab.example.net, corp.example
//! $LocalHosts gateway.isp.example
//! ```

use std::fs;
use std::path::Path;

use acl::{AclOptions, AllowedSenders, ListBuilder, add_allowed_sender_line};
use dns::Resolver;
use hostname::NamingOptions;
use logging::{DiagnosticSink, targets};

use crate::error::ConfigError;

/// Everything the admission decision depends on.
///
/// A configuration is built completely before it is published, and is never
/// modified afterwards.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ReceiverConfig {
    senders: AllowedSenders,
    acl: AclOptions,
    naming: NamingOptions,
}

impl ReceiverConfig {
    /// Creates an unrestricted configuration with the given naming options.
    #[must_use]
    pub fn with_naming(naming: NamingOptions) -> Self {
        Self::with_options(AclOptions::default(), naming)
    }

    /// Creates an unrestricted configuration with the given options.
    #[must_use]
    pub fn with_options(acl: AclOptions, naming: NamingOptions) -> Self {
        Self {
            senders: AllowedSenders::new(),
            acl,
            naming,
        }
    }

    /// Reads and parses the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, plus every
    /// error of [`ReceiverConfig::parse`].
    pub fn load(
        path: &Path,
        dns: &dyn Resolver,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, ConfigError> {
        Self::with_naming(NamingOptions::from_system()).apply_file(path, dns, sink)
    }

    /// Parses configuration text, starting from the machine's local domain.
    ///
    /// `origin` names the source in errors and diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for an unknown directive or a malformed
    /// value and [`ConfigError::Acl`] when list construction fails fatally.
    pub fn parse(
        input: &str,
        origin: &Path,
        dns: &dyn Resolver,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, ConfigError> {
        Self::with_naming(NamingOptions::from_system()).apply(input, origin, dns, sink)
    }

    /// Applies configuration text on top of `self`.
    ///
    /// # Errors
    ///
    /// Same as [`ReceiverConfig::parse`].
    pub fn apply(
        self,
        input: &str,
        origin: &Path,
        dns: &dyn Resolver,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, ConfigError> {
        let mut parser = Parser {
            config: self,
            path: origin,
            line_number: 0,
            dns,
            sink,
        };
        parser.parse(input)?;
        Ok(parser.config)
    }

    /// Reads the file at `path` and applies it on top of `self`.
    ///
    /// # Errors
    ///
    /// Same as [`ReceiverConfig::load`].
    pub fn apply_file(
        self,
        path: &Path,
        dns: &dyn Resolver,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        self.apply(&contents, path, dns, sink)
    }

    /// Allowed-sender lists.
    #[must_use]
    pub const fn senders(&self) -> &AllowedSenders {
        &self.senders
    }

    /// Options in effect after the last directive.
    #[must_use]
    pub const fn acl_options(&self) -> AclOptions {
        self.acl
    }

    /// Peer naming policy.
    #[must_use]
    pub const fn naming(&self) -> &NamingOptions {
        &self.naming
    }
}

struct Parser<'a> {
    config: ReceiverConfig,
    path: &'a Path,
    line_number: usize,
    dns: &'a dyn Resolver,
    sink: &'a dyn DiagnosticSink,
}

impl Parser<'_> {
    fn parse(&mut self, input: &str) -> Result<(), ConfigError> {
        for line in input.lines() {
            self.line_number += 1;
            let trimmed = line.trim();

            // Skip comments and blank lines
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some(directive) = trimmed.strip_prefix('$') else {
                return Err(self.error(format!("expected a $-directive, found '{trimmed}'")));
            };
            let (name, value) = directive
                .split_once(char::is_whitespace)
                .map_or((directive, ""), |(name, value)| (name, value.trim()));
            self.directive(name, value)?;
        }

        let entries: usize = acl::Protocol::ALL
            .iter()
            .map(|protocol| self.config.senders.list(*protocol).len())
            .sum();
        self.sink.info(
            targets::CONFIG,
            format!(
                "{}: {entries} allowed sender entries configured",
                self.path.display()
            ),
        );
        Ok(())
    }

    fn directive(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name.to_ascii_lowercase().as_str() {
            "allowedsender" => self.allowed_sender(value),
            "acladdhostnameonfail" => {
                self.config.acl.add_hostname_on_failure = self.parse_bool(value)?;
                Ok(())
            }
            "aclresolvehostname" => {
                self.config.acl.resolve_hostnames = self.parse_bool(value)?;
                Ok(())
            }
            "dropmsgswithmaliciousdnsptrrecords" => {
                self.config.naming.drop_malicious_ptr = self.parse_bool(value)?;
                Ok(())
            }
            "disabledns" => {
                let disabled = self.parse_bool(value)?;
                self.config.acl.dns_enabled = !disabled;
                self.config.naming.dns_enabled = !disabled;
                Ok(())
            }
            "localdomain" => {
                let domain = self.parse_list(value);
                match domain.as_slice() {
                    [domain] => {
                        self.config.naming.local_domain = domain.clone();
                        Ok(())
                    }
                    _ => Err(self.error("$LocalDomain takes exactly one domain name")),
                }
            }
            "stripdomains" => {
                let domains = self.parse_list(value);
                self.config.naming.strip_domains.extend(domains);
                Ok(())
            }
            "localhosts" => {
                let hosts = self.parse_list(value);
                self.config.naming.local_hosts.extend(hosts);
                Ok(())
            }
            _ => Err(self.error(format!("unknown directive '${name}'"))),
        }
    }

    fn allowed_sender(&mut self, value: &str) -> Result<(), ConfigError> {
        let (protocol, rest) = value
            .split_once(|c: char| c == ',' || c.is_whitespace())
            .unwrap_or((value, ""));
        if protocol.is_empty() {
            return Err(self.error("$AllowedSender requires a protocol"));
        }

        let builder = ListBuilder::new(self.config.acl, self.dns, self.sink);
        match add_allowed_sender_line(&mut self.config.senders, &builder, protocol, rest) {
            Ok(_) => Ok(()),
            Err(source) if source.is_fatal() => Err(ConfigError::Acl {
                path: self.path.to_path_buf(),
                line: self.line_number,
                source,
            }),
            // Already reported by the line handler.
            Err(_) => Ok(()),
        }
    }

    fn parse_bool(&self, value: &str) -> Result<bool, ConfigError> {
        match strip_comment(value).to_ascii_lowercase().as_str() {
            "on" | "yes" | "true" | "1" => Ok(true),
            "off" | "no" | "false" | "0" => Ok(false),
            _ => Err(self.error(format!("invalid boolean value '{value}'"))),
        }
    }

    fn parse_list(&self, value: &str) -> Vec<String> {
        strip_comment(value)
            .split([',', ' ', '\t'])
            .map(|name| name.trim().trim_end_matches('.'))
            .filter(|name| !name.is_empty())
            .map(str::to_ascii_lowercase)
            .collect()
    }

    fn error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::parse_error(self.path, self.line_number, message)
    }
}

fn strip_comment(value: &str) -> &str {
    value.split('#').next().unwrap_or_default().trim()
}
