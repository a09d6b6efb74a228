//! Diagnostics reporting with hierarchical scopes

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

/// What kind of ambiguity or defect was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// No recognizable header row; the fixed fallback column layout was
    /// applied to the sheet.
    FallbackColumnLayout,
    /// Exercises appeared without a preceding day marker; a day label was
    /// synthesized.
    SynthesizedDay,
    /// Two sheets claimed the same week number; days were concatenated.
    DuplicateWeek,
    /// A row looked like an exercise but had no usable name; it was
    /// skipped.
    MalformedRow,
}

/// Scope of a diagnostic (workbook, sheet, or row level).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticScope {
    Book,
    Sheet(String),
    /// Sheet name plus 0-based row index.
    Row(String, usize),
}

impl DiagnosticScope {
    pub fn sheet_name(&self) -> Option<&str> {
        match self {
            DiagnosticScope::Book => None,
            DiagnosticScope::Sheet(name) => Some(name),
            DiagnosticScope::Row(name, _) => Some(name),
        }
    }
}

impl PartialOrd for DiagnosticScope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DiagnosticScope {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (DiagnosticScope::Book, DiagnosticScope::Book) => Ordering::Equal,
            (DiagnosticScope::Book, _) => Ordering::Less,
            (_, DiagnosticScope::Book) => Ordering::Greater,
            (DiagnosticScope::Sheet(a), DiagnosticScope::Sheet(b)) => a.cmp(b),
            (DiagnosticScope::Sheet(a), DiagnosticScope::Row(b, _)) => {
                a.cmp(b).then(Ordering::Less)
            }
            (DiagnosticScope::Row(a, _), DiagnosticScope::Sheet(b)) => {
                a.cmp(b).then(Ordering::Greater)
            }
            (DiagnosticScope::Row(sheet_a, row_a), DiagnosticScope::Row(sheet_b, row_b)) => {
                sheet_a.cmp(sheet_b).then_with(|| row_a.cmp(row_b))
            }
        }
    }
}

/// One recorded ambiguity resolution or skipped row.
///
/// Every inference the pipeline makes (fallback layout, synthesized day,
/// duplicate-week merge, malformed row) lands here so callers can inspect
/// what was inferred versus explicitly found. Nothing is only printed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub scope: DiagnosticScope,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        scope: DiagnosticScope,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            kind,
            scope,
            message: message.into(),
            severity,
        }
    }
}
