//! crates/logging/src/diagnostic.rs
//! Diagnostic event type and the sink trait.

use std::fmt;

/// Well-known diagnostic targets.
pub mod targets {
    /// Allowed-sender list construction and matching.
    pub const ACL: &str = "syslog_acl::acl";
    /// Peer hostname resolution.
    pub const DNS: &str = "syslog_acl::dns";
    /// Configuration file loading.
    pub const CONFIG: &str = "syslog_acl::config";
}

/// Severity attached to a [`Diagnostic`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Severity {
    /// A decision was rejected or a value was unusable.
    Error,
    /// A value was adjusted or ignored but processing continued.
    Warning,
    /// Informational event.
    Info,
    /// Developer-oriented detail.
    Debug,
}

impl Severity {
    /// Returns the lowercase label used when rendering the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single formatted diagnostic.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    target: &'static str,
    message: String,
}

impl Diagnostic {
    /// Creates a diagnostic for `target` with the given severity and message.
    #[must_use]
    pub fn new(severity: Severity, target: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity,
            target,
            message: message.into(),
        }
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the subsystem target, e.g. [`targets::ACL`].
    #[must_use]
    pub const fn target(&self) -> &'static str {
        self.target
    }

    /// Returns the rendered message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// One-way destination for diagnostics.
///
/// Implementations must not fail and must be callable from several threads at
/// once. Only [`emit`](Self::emit) is required.
pub trait DiagnosticSink: Send + Sync {
    /// Records `diagnostic`.
    fn emit(&self, diagnostic: Diagnostic);

    /// Emits an [`Severity::Error`] diagnostic.
    fn error(&self, target: &'static str, message: String) {
        self.emit(Diagnostic::new(Severity::Error, target, message));
    }

    /// Emits a [`Severity::Warning`] diagnostic.
    fn warning(&self, target: &'static str, message: String) {
        self.emit(Diagnostic::new(Severity::Warning, target, message));
    }

    /// Emits a [`Severity::Info`] diagnostic.
    fn info(&self, target: &'static str, message: String) {
        self.emit(Diagnostic::new(Severity::Info, target, message));
    }

    /// Emits a [`Severity::Debug`] diagnostic.
    fn debug(&self, target: &'static str, message: String) {
        self.emit(Diagnostic::new(Severity::Debug, target, message));
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<S> {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}
