use std::io;
use std::path::{Path, PathBuf};

use acl::AclError;
use thiserror::Error;

/// Errors that abort loading a receiver configuration.
///
/// Rules that fail individually are reported as diagnostics and skipped; they
/// never surface here.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A line is not a known directive or carries a malformed value.
    #[error("{}: line {line}: {message}", path.display())]
    Parse {
        /// Configuration origin.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// What is wrong with the line.
        message: String,
    },
    /// Building the allowed-sender lists failed fatally.
    #[error("{}: line {line}: {source}", path.display())]
    Acl {
        /// Configuration origin.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Fatal list construction error.
        #[source]
        source: AclError,
    },
}

impl ConfigError {
    pub(crate) fn io_error(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse_error(path: &Path, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Returns the configuration origin.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } | Self::Acl { path, .. } => path,
        }
    }

    /// Returns the line number where the error occurred, if any.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::Parse { line, .. } | Self::Acl { line, .. } => Some(*line),
        }
    }
}
