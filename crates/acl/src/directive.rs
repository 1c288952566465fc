//! crates/acl/src/directive.rs
//!
//! Tokenizing and applying the argument list of an `$AllowedSender` line.
//!
//! A line names a protocol followed by comma or whitespace separated tokens:
//!
//! ```text
//! $AllowedSender UDP, 127.0.0.1, 192.0.2.0/24, [::1]/128, *.example.net
//! ```
//!
//! Each token is an IPv4 address, a bracketed or bare IPv6 address with an
//! optional numeric `%scope`, or a hostname. Addresses take an optional
//! `/bits` suffix; hostnames do not. A `#` ends the token list.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6};

use logging::targets;

use crate::builder::{ListBuilder, SenderTarget};
use crate::error::{AclError, AclResult};
use crate::mask::{IPV4_MAX_BITS, IPV6_MAX_BITS};
use crate::registry::{AllowedSenders, Protocol};

/// Iterator over the tokens of an allowed-sender argument list.
///
/// Yields `(target, bits)` pairs. Tokenizing stops at the end of input or at
/// a `#` comment marker.
#[derive(Clone, Debug)]
pub struct SenderTokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SenderTokenizer<'a> {
    /// Creates a tokenizer over `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Number of bytes of the input consumed so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.pos
    }

    fn skip_separators(&mut self) {
        let rest = &self.input[self.pos..];
        let trimmed = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
        self.pos += rest.len() - trimmed.len();
    }
}

impl Iterator for SenderTokenizer<'_> {
    type Item = AclResult<(SenderTarget, u8)>;

    fn next(&mut self) -> Option<Self::Item> {
        self.skip_separators();
        let rest = &self.input[self.pos..];
        if rest.is_empty() || rest.starts_with('#') {
            return None;
        }

        let end = rest
            .find(|c: char| c == ',' || c == '#' || c.is_whitespace())
            .unwrap_or(rest.len());
        self.pos += end;
        Some(parse_sender_token(&rest[..end]))
    }
}

/// Parses a single allowed-sender token.
///
/// Addresses default to a full-length prefix.
///
/// # Errors
///
/// Returns [`AclError::InvalidInput`] for a malformed prefix, a prefix on a
/// hostname, a malformed scope id, or characters that
/// cannot appear in a hostname.
pub fn parse_sender_token(token: &str) -> AclResult<(SenderTarget, u8)> {
    let (body, prefix) = match token.rsplit_once('/') {
        Some((body, prefix)) => (body, Some(parse_prefix(token, prefix)?)),
        None => (token, None),
    };

    if let Some(inner) = body.strip_prefix('[') {
        let inner = inner
            .strip_suffix(']')
            .ok_or_else(|| AclError::invalid(token, "missing closing bracket"))?;
        return parse_ipv6(token, inner, prefix);
    }

    if let Ok(v4) = body.parse::<Ipv4Addr>() {
        let addr = SocketAddr::V4(SocketAddrV4::new(v4, 0));
        return Ok((SenderTarget::from(addr), prefix.unwrap_or(IPV4_MAX_BITS)));
    }

    if body.contains(':') {
        return parse_ipv6(token, body, prefix);
    }

    if prefix.is_some() {
        return Err(AclError::invalid(token, "a hostname can not carry a prefix length"));
    }
    if body.is_empty() || !body.bytes().all(is_hostname_byte) {
        return Err(AclError::invalid(token, "not an address or hostname"));
    }
    Ok((SenderTarget::Hostname(body.to_owned()), 0))
}

/// Oversized prefixes saturate at 255 and are clamped by the builder.
fn parse_prefix(token: &str, prefix: &str) -> AclResult<u8> {
    if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AclError::invalid(token, "prefix length is not a number"));
    }
    Ok(prefix.parse().unwrap_or(u8::MAX))
}

fn parse_ipv6(token: &str, text: &str, prefix: Option<u8>) -> AclResult<(SenderTarget, u8)> {
    let (addr, scope_id) = match text.split_once('%') {
        Some((addr, scope)) => {
            let scope_id = scope
                .parse::<u32>()
                .map_err(|_| AclError::invalid(token, "scope id must be numeric"))?;
            (addr, scope_id)
        }
        None => (text, 0),
    };
    let v6 = addr
        .parse::<Ipv6Addr>()
        .map_err(|_| AclError::invalid(token, "malformed IPv6 address"))?;
    let addr = SocketAddr::V6(SocketAddrV6::new(v6, 0, 0, scope_id));
    Ok((SenderTarget::from(addr), prefix.unwrap_or(IPV6_MAX_BITS)))
}

const fn is_hostname_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-' | b'_' | b'*' | b'?')
}

/// Applies the argument list of one `$AllowedSender` line.
///
/// `protocol_name` selects the list (`udp`, `tcp` or `gss`, any case) and `rest`
/// holds the tokens. Tokens are added in order. A rule that fails softly is
/// logged and skipped; a malformed token abandons the rest of the line.
/// Returns the number of bytes of `rest` consumed.
///
/// # Errors
///
/// - [`AclError::InvalidInput`] for an unknown protocol or a malformed token.
///   Entries added before a malformed token are kept.
/// - [`AclError::OutOfMemory`] if a list cannot grow. Nothing more is added.
pub fn add_allowed_sender_line(
    registry: &mut AllowedSenders,
    builder: &ListBuilder<'_>,
    protocol_name: &str,
    rest: &str,
) -> AclResult<usize> {
    let sink = builder.sink();
    let protocol_name = protocol_name.trim();
    let protocol: Protocol = protocol_name.parse().inspect_err(|_| {
        sink.error(
            targets::CONFIG,
            format!("Invalid protocol '{protocol_name}' in allowed sender list, line ignored."),
        );
    })?;

    let list = registry.list_mut(protocol);
    let mut tokens = SenderTokenizer::new(rest);
    for token in tokens.by_ref() {
        let (target, bits) = token.inspect_err(|error| {
            sink.error(
                targets::CONFIG,
                format!("Error parsing allowed sender list: {error} - rest of line ignored."),
            );
        })?;

        if let Err(error) = builder.add_allowed_sender(list, &target, bits) {
            if error.is_fatal() {
                sink.error(
                    targets::CONFIG,
                    format!(
                        "Error adding allowed sender entry \"{target}\": {error} - terminating, nothing more will be added."
                    ),
                );
                return Err(error);
            }
            sink.warning(
                targets::CONFIG,
                format!("Error adding allowed sender entry \"{target}\": {error} - ignoring."),
            );
        }
    }
    Ok(tokens.consumed())
}
