#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` provides the one-way diagnostic channel used by the allowed-sender
//! and peer-hostname crates. Every rejected or degraded decision (an ignored
//! prefix, a hostname that failed to resolve, a forged PTR record) is reported
//! as a [`Diagnostic`] through a [`DiagnosticSink`] so operators can see which
//! IP, hostname, or prefix was involved.
//!
//! # Design
//!
//! - [`DiagnosticSink`] is an object-safe trait with a single required method,
//!   [`emit`](DiagnosticSink::emit). Convenience methods such as
//!   [`error`](DiagnosticSink::error) build the [`Diagnostic`] for the caller.
//! - [`TracingSink`] forwards diagnostics to the `tracing` macros so the
//!   configured subscriber decides where they end up. [`init_tracing`] installs
//!   a formatting subscriber driven by an [`EnvFilter`](tracing_subscriber::EnvFilter).
//! - [`MemorySink`] records diagnostics in memory. Tests use it to assert on
//!   the exact messages emitted by a decision.
//!
//! # Invariants
//!
//! - Emitting a diagnostic never fails and never blocks for longer than it
//!   takes to acquire an uncontended lock.
//! - [`MemorySink`] preserves emission order.
//!
//! # Examples
//!
//! ```
//! use logging::{DiagnosticSink, MemorySink, Severity, targets};
//!
//! let sink = MemorySink::new();
//! sink.warning(targets::ACL, "Invalid bit number in IPv4 address - adjusted to 32".to_owned());
//!
//! let events = sink.drain();
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].severity(), Severity::Warning);
//! assert!(sink.drain().is_empty());
//! ```

mod diagnostic;
mod memory;
mod tracing_bridge;

pub use diagnostic::{Diagnostic, DiagnosticSink, Severity, targets};
pub use memory::MemorySink;
pub use tracing_bridge::{TracingSink, init_tracing, init_tracing_with_filter};
