//! Extraction diagnostics
//!
//! The extractor never fails; everything it has to say about the input goes
//! through a [`DiagnosticSink`]. Callers choose whether that ends up in a
//! log, in a list, or nowhere.

use std::fmt;

/// A single observation made while extracting fields. Row numbers are
/// 1-based positions in the row sequence handed to the extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    FieldStarted { row: usize, name: String },
    ValuesAppended { row: usize, field: String, count: usize },
    FieldSealed { name: String, value_count: usize },
    /// A data row appeared before any marker row and was dropped.
    OrphanRow { row: usize, cells: Vec<String> },
    Finished { field_count: usize },
}

impl Diagnostic {
    pub fn is_warning(&self) -> bool {
        matches!(self, Self::OrphanRow { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FieldStarted { row, name } => {
                write!(f, "Row {}: found new field '{}'", row, name)
            }
            Self::ValuesAppended { row, field, count } => {
                write!(f, "Row {}: added {} value(s) to field '{}'", row, count, field)
            }
            Self::FieldSealed { name, value_count } => {
                write!(f, "Field '{}' closed with {} value(s)", name, value_count)
            }
            Self::OrphanRow { row, .. } => {
                write!(f, "Row {}: skipped, no current field defined", row)
            }
            Self::Finished { field_count } => {
                write!(f, "Finished extraction, {} field(s) found", field_count)
            }
        }
    }
}

/// Receives diagnostics from the extractor.
pub trait DiagnosticSink {
    fn record(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn record(&mut self, diagnostic: Diagnostic) {
        (**self).record(diagnostic);
    }
}

/// Discards every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&mut self, _diagnostic: Diagnostic) {}
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::FieldStarted { row, name } => {
                tracing::info!(row, field = %name, "Found new field");
            }
            Diagnostic::ValuesAppended { row, field, count } => {
                tracing::debug!(row, field = %field, count, "Adding values to current field");
            }
            Diagnostic::FieldSealed { name, value_count } => {
                tracing::debug!(field = %name, value_count, "Appending field");
            }
            Diagnostic::OrphanRow { row, cells } => {
                tracing::warn!(row, cells = ?cells, "Skipping row: no current field defined");
            }
            Diagnostic::Finished { field_count } => {
                tracing::info!(field_count, "Finished extracting fields");
            }
        }
    }
}

/// Keeps every diagnostic and also traces it.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for RecordingSink {
    fn record(&mut self, diagnostic: Diagnostic) {
        TracingSink.record(diagnostic.clone());
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_orphan_rows_are_warnings() {
        assert!(Diagnostic::OrphanRow { row: 1, cells: vec!["x".into()] }.is_warning());
        assert!(!Diagnostic::Finished { field_count: 0 }.is_warning());
        assert!(!Diagnostic::FieldStarted { row: 1, name: "A".into() }.is_warning());
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        sink.record(Diagnostic::OrphanRow { row: 1, cells: Vec::new() });
        sink.record(Diagnostic::FieldStarted { row: 2, name: "A".into() });

        assert_eq!(sink.warnings().count(), 1);
        assert_eq!(
            sink.into_diagnostics()[1],
            Diagnostic::FieldStarted { row: 2, name: "A".into() }
        );
    }

    #[test]
    fn test_orphan_row_message() {
        let diagnostic = Diagnostic::OrphanRow { row: 4, cells: Vec::new() };
        assert_eq!(diagnostic.to_string(), "Row 4: skipped, no current field defined");
    }
}
