//! Diagnostic reporting.
//!
//! Diagnostics are delivered to a [`DiagnosticSink`] the moment they are
//! detected; nothing is buffered or batched by the interpreter. The default
//! [`TracingSink`] turns each one into a `tracing` event, so hosts control where
//! they end up with an ordinary subscriber.

use core::cell::RefCell;
use core::fmt;

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The run is failing or a call could not be completed.
    Error,
    /// Suspicious, but execution carries on.
    Warning,
    /// Informational message.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A human-readable diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Emits every diagnostic as a `tracing` event at the matching level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        trace_diagnostic(&diagnostic);
    }
}

/// Records diagnostics in order, and forwards them to `tracing` as well.
///
/// Useful for hosts that want to inspect what a run reported.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    /// Messages of everything emitted so far with the given severity.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        trace_diagnostic(&diagnostic);
        self.diagnostics.borrow_mut().push(diagnostic);
    }
}

fn trace_diagnostic(diagnostic: &Diagnostic) {
    match diagnostic.severity {
        Severity::Error => tracing::error!("{}", diagnostic.message),
        Severity::Warning => tracing::warn!("{}", diagnostic.message),
        Severity::Info => tracing::info!("{}", diagnostic.message),
    }
}
