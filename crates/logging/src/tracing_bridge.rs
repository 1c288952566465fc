//! crates/logging/src/tracing_bridge.rs
//! Bridge between [`DiagnosticSink`] and the `tracing` ecosystem.
//!
//! [`TracingSink`] turns each [`Diagnostic`] into a `tracing` event whose level
//! follows the diagnostic severity. The diagnostic target is recorded in the
//! `subsystem` field because `tracing` requires event targets to be known at
//! compile time.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logging::{TracingSink, init_tracing};
//!
//! init_tracing("info");
//! let sink = TracingSink;
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

use crate::{Diagnostic, DiagnosticSink, Severity};

/// Sink that forwards diagnostics to the active `tracing` subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let subsystem = diagnostic.target();
        let message = diagnostic.message();
        match diagnostic.severity() {
            Severity::Error => tracing::error!(subsystem, "{message}"),
            Severity::Warning => tracing::warn!(subsystem, "{message}"),
            Severity::Info => tracing::info!(subsystem, "{message}"),
            Severity::Debug => tracing::debug!(subsystem, "{message}"),
        }
    }
}

/// Installs a formatting subscriber filtered by `directives`.
///
/// `directives` uses [`EnvFilter`] syntax (for example `"warn"` or
/// `"info,allowed_senders=debug"`). When the `RUST_LOG` environment variable
/// is set it takes precedence. Calling this more than once is harmless: later
/// calls leave the first subscriber in place.
pub fn init_tracing(directives: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
    init_tracing_with_filter(filter);
}

/// Installs a formatting subscriber combined with a caller-provided filter layer.
pub fn init_tracing_with_filter<F>(filter: F)
where
    F: Layer<tracing_subscriber::Registry> + Send + Sync + 'static,
{
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
