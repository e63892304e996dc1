//! Diagnostics sinks.
//!
//! Validators receive a sink at construction and report every recoverable
//! issue to it, in addition to attaching the issue to the affected result.

use crate::core::error::{Diagnostic, DiagnosticKind};
use parking_lot::Mutex;
use std::sync::Arc;

/// Receiver for recoverable validation issues.
///
/// Sinks are shared between rayon workers and must be thread-safe.
pub trait DiagnosticsSink: Send + Sync {
    /// Report one issue.
    fn report(&self, diagnostic: &Diagnostic);
}

/// Shared sink handle.
pub type SharedDiagnostics = Arc<dyn DiagnosticsSink>;

/// Sink that drops everything. Default for validators.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl DiagnosticsSink for NoopDiagnostics {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Sink forwarding to the `log` facade.
///
/// Malformed input is logged at `warn`, everything else at `debug`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics;

impl DiagnosticsSink for LogDiagnostics {
    fn report(&self, diagnostic: &Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::MalformedInput => log::warn!("{}", diagnostic),
            _ => log::debug!("{}", diagnostic),
        }
    }
}

/// Sink that keeps every reported issue in memory.
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingDiagnostics {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the collected issues.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Number of collected issues of a kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.lock().iter().filter(|d| d.kind == kind).count()
    }
}

impl DiagnosticsSink for CollectingDiagnostics {
    fn report(&self, diagnostic: &Diagnostic) {
        self.entries.lock().push(diagnostic.clone());
    }
}

/// The default sink.
pub fn noop() -> SharedDiagnostics {
    Arc::new(NoopDiagnostics)
}
