//! Diagnostics reported while loading and writing configurations.
//!
//! Load and write take a [`DiagnosticSink`] argument instead of logging
//! through global state. [`TracingSink`] is the usual choice and forwards to
//! `tracing`; [`CollectingSink`] keeps everything in memory for tools that
//! want to show the messages themselves.

use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Error => "error",
        };
        write!(f, "[{}] {}", level, self.message)
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);

    fn debug(&self, message: String) {
        self.report(Diagnostic::new(Severity::Debug, message));
    }

    fn info(&self, message: String) {
        self.report(Diagnostic::new(Severity::Info, message));
    }

    fn error(&self, message: String) {
        self.report(Diagnostic::new(Severity::Error, message));
    }
}

/// Forwards diagnostics to `tracing` under the `configurable` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Debug => tracing::debug!(target: "configurable", "{}", diagnostic.message),
            Severity::Info => tracing::info!(target: "configurable", "{}", diagnostic.message),
            Severity::Error => tracing::error!(target: "configurable", "{}", diagnostic.message),
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything reported so far, oldest first.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Diagnostics at or above `severity`.
    pub fn at_least(&self, severity: Severity) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .iter()
            .filter(|d| d.severity >= severity)
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }
}
