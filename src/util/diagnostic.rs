//! Non-fatal synthesis diagnostics.
//!
//! Diagnostics never interrupt a build: undecipherable identifiers, excluded
//! names, and unresolved packages all end as silent omissions from the output
//! plus one of these records. They are both logged through `tracing` at the
//! point of origin and collected into the synthesis report, so tests can
//! assert on them without installing a subscriber.

use std::fmt;

/// Severity of a diagnostic.
///
/// Warnings are always surfaced; notes only when debug mode is enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// A non-fatal diagnostic emitted during synthesis.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Severity level
    pub severity: Severity,
    /// Additional context lines
    pub context: Vec<String>,
}

impl Diagnostic {
    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Warning,
            context: Vec::new(),
        }
    }

    /// Create a note diagnostic (debug mode only).
    pub fn note(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            severity: Severity::Note,
            context: Vec::new(),
        }
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let severity = if color {
            match self.severity {
                Severity::Warning => "\x1b[1;33mwarning\x1b[0m",
                Severity::Note => "\x1b[1;36mnote\x1b[0m",
            }
        } else {
            match self.severity {
                Severity::Warning => "warning",
                Severity::Note => "note",
            }
        };

        let mut output = format!("{}: {}\n", severity, self.message);
        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }
        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}

/// Collects diagnostics during one synthesis pass.
///
/// Warnings are always recorded and logged; notes are logged at debug level
/// and recorded only when debug mode is on.
#[derive(Debug)]
pub struct DiagnosticLog {
    debug: bool,
    entries: Vec<Diagnostic>,
}

impl DiagnosticLog {
    pub fn new(debug: bool) -> Self {
        DiagnosticLog {
            debug,
            entries: Vec::new(),
        }
    }

    /// Record a warning.
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        tracing::warn!("{}", diagnostic.message);
        self.entries.push(diagnostic);
    }

    /// Record a note; dropped unless debug mode is on.
    pub fn note(&mut self, diagnostic: Diagnostic) {
        tracing::debug!("{}", diagnostic.message);
        if self.debug {
            self.entries.push(diagnostic);
        }
    }

    /// All recorded diagnostics, in emission order.
    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_formatting() {
        let diag = Diagnostic::warning("could not resolve a version for `left-pad`")
            .with_context("searched 2 source manifests");

        let output = diag.format(false);
        assert!(output.contains("warning: could not resolve"));
        assert!(output.contains("-> searched 2 source manifests"));
    }

    #[test]
    fn test_note_severity() {
        let diag = Diagnostic::note("excluded `aws-sdk`");
        assert_eq!(diag.severity, Severity::Note);
        assert!(diag.format(false).starts_with("note:"));
    }

    #[test]
    fn test_log_gates_notes_on_debug() {
        let mut log = DiagnosticLog::new(false);
        log.warn(Diagnostic::warning("kept"));
        log.note(Diagnostic::note("dropped"));
        assert_eq!(log.into_entries().len(), 1);

        let mut log = DiagnosticLog::new(true);
        log.note(Diagnostic::note("kept"));
        assert_eq!(log.into_entries().len(), 1);
    }
}
