//! crates/acl/src/error.rs
//!
//! Error types for allowed-sender list construction.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type for allowed-sender list construction.
pub type AclResult<T> = Result<T, AclError>;

/// Errors produced while building allowed-sender lists.
///
/// Only [`AclError::OutOfMemory`] is fatal to the configuration batch. Every
/// other variant concerns a single entry or line, which is logged and skipped.
#[derive(Debug, Error)]
pub enum AclError {
    /// Growing a list failed.
    #[error("out of memory while adding allowed sender entry")]
    OutOfMemory(
        #[from]
        #[source]
        TryReserveError,
    ),
    /// A token, prefix, or protocol name is unusable.
    #[error("invalid allowed sender '{value}': {reason}")]
    InvalidInput {
        /// Offending value as written.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// The socket address is neither IPv4 nor IPv6.
    #[error("unsupported address family {family} in allowed sender entry")]
    InvalidAddressFamily {
        /// Raw address family number.
        family: i32,
    },
    /// A hostname could not be resolved and no entry was added for it.
    #[error("hostname \"{hostname}\" could not be resolved, no entry added")]
    NoEntry {
        /// Hostname that failed to resolve.
        hostname: String,
    },
}

impl AclError {
    pub(crate) fn invalid(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` if processing of further entries must stop.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::OutOfMemory(_))
    }
}
