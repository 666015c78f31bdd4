//! Structured diagnostics for skipped or failed conversion units.
//!
//! A failure while converting one block or one model never aborts the run.
//! It is recorded here with the block or model it concerns and mirrored to
//! the `log` facade, so callers get both a queryable report and regular
//! log output.

use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Expected skips (no schema, entity-rendered items).
    Info,
    /// Recoverable data problems (unresolved texture, unparseable asset).
    Warning,
    /// A whole block or model was excluded from the output.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// One diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// The block or model the event is about.
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.subject, self.message)
    }
}

/// Collector for diagnostics produced during one conversion run.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and forward it to the logger.
    pub fn record(&mut self, severity: Severity, subject: impl Into<String>, message: impl Into<String>) {
        let diagnostic = Diagnostic {
            severity,
            subject: subject.into(),
            message: message.into(),
        };

        match severity {
            Severity::Info => log::info!("{}: {}", diagnostic.subject, diagnostic.message),
            Severity::Warning => log::warn!("{}: {}", diagnostic.subject, diagnostic.message),
            Severity::Critical => log::error!("{}: {}", diagnostic.subject, diagnostic.message),
        }

        self.entries.push(diagnostic);
    }

    pub fn info(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.record(Severity::Info, subject, message);
    }

    pub fn warning(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.record(Severity::Warning, subject, message);
    }

    pub fn critical(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.record(Severity::Critical, subject, message);
    }

    /// All recorded diagnostics in the order they occurred.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Number of diagnostics at the given severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
