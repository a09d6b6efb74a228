//! Row segmentation: partition a sheet into semantic blocks

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::config::ExtractorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticScope, Severity};
use crate::error::ExtractError;
use crate::reader::{CellValue, Grid};

/// Semantic role of a contiguous row range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    Day,
    ExerciseGroup,
    Note,
}

/// A contiguous row range `start..end` tagged with one role.
///
/// Blocks cover every row of the grid; rows with no informational content
/// land in `Note` blocks so row indices stay meaningful for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub start: usize,
    pub end: usize,
    /// Set on a `Note` block that contains two or more consecutive fully
    /// blank rows. Such a gap forces a day boundary downstream.
    pub hard_break: bool,
}

impl Block {
    pub fn rows(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Logical-field to column-index mapping for one sheet, built from the
/// header block (or the fixed fallback layout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub name: usize,
    pub sets: Option<usize>,
    pub reps: Option<usize>,
    pub load: Option<usize>,
    pub notes: Option<usize>,
    /// False when the fallback layout was applied.
    pub from_header: bool,
}

/// Result of segmenting one sheet.
#[derive(Debug, Clone)]
pub struct Segmentation {
    pub blocks: Vec<Block>,
    /// `None` when the sheet has no recognizable header and the fallback
    /// layout is disabled; the sheet is then skipped.
    pub columns: Option<ColumnMap>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiled row-level token patterns, built once per extraction.
#[derive(Debug)]
pub struct RowTokens {
    day_re: Regex,
}

impl RowTokens {
    pub fn compile(config: &ExtractorConfig) -> Result<Self, ExtractError> {
        let alternatives: Vec<String> = config
            .day_tokens
            .iter()
            .map(|t| regex::escape(t))
            .collect();
        let pattern = format!(r"^(?:{})\b", alternatives.join("|"));
        let day_re = RegexBuilder::new(&pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| ExtractError::InvalidPattern {
                pattern,
                source,
            })?;
        Ok(Self { day_re })
    }

    pub fn is_day_label(&self, text: &str) -> bool {
        self.day_re.is_match(text)
    }
}

// A sets/reps-looking cell: a bare number or a range like "8-12", "3x8".
static NUMERIC_RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\.\d+)?(?:\s*[-–/xX×]\s*\d+(?:\.\d+)?)?$").unwrap()
});

/// Whether a cell reads as a sets/reps value: a number, or text that is a
/// bare number or a numeric range.
pub(crate) fn is_numeric_or_range(cell: &CellValue) -> bool {
    match cell {
        CellValue::Number(_) => true,
        CellValue::Text(t) => is_numeric_or_range_text(t),
        CellValue::Empty => false,
    }
}

pub(crate) fn is_numeric_or_range_text(text: &str) -> bool {
    NUMERIC_RANGE_RE.is_match(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowShape {
    Blank,
    Day,
    Exercise,
    /// Numeric cells only: merged-cell bleed inside an exercise group, or
    /// a stray row the interpreter will flag.
    NumericOnly,
    TextOnly,
}

fn shape_of_row(cells: &[CellValue], tokens: &RowTokens) -> RowShape {
    let non_empty = cells.iter().filter(|c| !c.is_empty()).count();
    if non_empty == 0 {
        return RowShape::Blank;
    }

    let numeric = cells.iter().filter(|c| is_numeric_or_range(c)).count();
    let texts = cells
        .iter()
        .filter_map(CellValue::as_text)
        .filter(|t| !is_numeric_or_range_text(t))
        .count();

    let has_day_token = cells
        .iter()
        .filter_map(CellValue::as_text)
        .any(|t| tokens.is_day_label(t));
    if has_day_token && numeric == 0 && non_empty <= 3 {
        return RowShape::Day;
    }

    if numeric >= 1 && texts >= 1 {
        return RowShape::Exercise;
    }
    if numeric >= 1 {
        return RowShape::NumericOnly;
    }
    RowShape::TextOnly
}

/// Partition a sheet's rows into blocks and locate the sets/reps/load
/// columns.
///
/// Top-to-bottom scan keeping a current block kind. Text-only rows before
/// the first day or exercise block form the header; afterwards they are
/// notes. A single fully blank row closes the current block and is
/// absorbed into a `Note` block; two consecutive blank rows additionally
/// mark that block as a hard day boundary.
pub fn segment_sheet(
    grid: &Grid,
    sheet_name: &str,
    config: &ExtractorConfig,
    tokens: &RowTokens,
) -> Segmentation {
    let mut blocks: Vec<Block> = Vec::new();
    let mut seen_body = false;
    let mut blank_run = 0usize;

    for row_idx in 0..grid.n_rows() {
        let shape = shape_of_row(grid.row(row_idx), tokens);

        let kind = match shape {
            RowShape::Blank => BlockKind::Note,
            RowShape::Day => BlockKind::Day,
            // Numeric-only rows stay exercise-shaped: inside a group they
            // are merged-cell bleed, on their own the interpreter reports
            // them as malformed rather than dropping data silently.
            RowShape::Exercise | RowShape::NumericOnly => BlockKind::ExerciseGroup,
            RowShape::TextOnly => {
                if seen_body {
                    BlockKind::Note
                } else {
                    BlockKind::Header
                }
            }
        };

        if matches!(kind, BlockKind::Day | BlockKind::ExerciseGroup) {
            seen_body = true;
        }

        blank_run = if shape == RowShape::Blank {
            blank_run + 1
        } else {
            0
        };

        match blocks.last_mut() {
            Some(last) if last.kind == kind && last.end == row_idx => {
                last.end = row_idx + 1;
                if blank_run >= 2 {
                    last.hard_break = true;
                }
            }
            _ => blocks.push(Block {
                kind,
                start: row_idx,
                end: row_idx + 1,
                hard_break: false,
            }),
        }
    }

    let mut diagnostics = Vec::new();
    let columns = locate_columns(grid, &blocks, sheet_name, config, &mut diagnostics);

    Segmentation {
        blocks,
        columns,
        diagnostics,
    }
}

/// Build the column map from the header block, or fall back to the fixed
/// layout (name, sets, reps, load in the first four used columns).
fn locate_columns(
    grid: &Grid,
    blocks: &[Block],
    sheet_name: &str,
    config: &ExtractorConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<ColumnMap> {
    // The label row is the header row with the most recognized labels.
    // Blank separators split the pre-body rows into several Header blocks
    // (title row, gap, real labels), so all of them are scanned; title
    // rows match nothing.
    let mut best: Option<(usize, usize)> = None; // (row, matches)
    for header in blocks.iter().filter(|b| b.kind == BlockKind::Header) {
        for row_idx in header.rows() {
            let matches = count_label_matches(grid.row(row_idx), config);
            if matches > 0 && best.is_none_or(|(_, m)| matches > m) {
                best = Some((row_idx, matches));
            }
        }
    }
    if let Some((label_row, _)) = best {
        return Some(map_from_labels(grid, label_row, config));
    }

    if !config.fallback_columns {
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::FallbackColumnLayout,
            DiagnosticScope::Sheet(sheet_name.to_string()),
            "no recognizable header row and fallback layout disabled; sheet skipped",
            Severity::Warning,
        ));
        return None;
    }

    let used = grid.used_columns();
    let col = |i: usize| used.get(i).copied();
    diagnostics.push(Diagnostic::new(
        DiagnosticKind::FallbackColumnLayout,
        DiagnosticScope::Sheet(sheet_name.to_string()),
        "no recognizable header row; assuming name, sets, reps, load in the first four columns",
        Severity::Warning,
    ));
    Some(ColumnMap {
        name: col(0).unwrap_or(0),
        sets: col(1),
        reps: col(2),
        load: col(3),
        notes: None,
        from_header: false,
    })
}

fn count_label_matches(cells: &[CellValue], config: &ExtractorConfig) -> usize {
    cells
        .iter()
        .filter_map(CellValue::as_text)
        .filter(|t| {
            let labels = &config.columns;
            [
                &labels.name,
                &labels.sets,
                &labels.reps,
                &labels.load,
                &labels.notes,
            ]
            .iter()
            .any(|synonyms| matches_label(t, synonyms))
        })
        .count()
}

// A synonym matches only as a whole leading word: "Weight (kg)" is a load
// column, "Setup" is not a sets column.
fn matches_label(text: &str, synonyms: &[String]) -> bool {
    let normalized = text.trim().to_lowercase();
    synonyms.iter().any(|s| {
        normalized
            .strip_prefix(s.as_str())
            .is_some_and(|rest| rest.chars().next().is_none_or(|c| !c.is_alphanumeric()))
    })
}

fn map_from_labels(grid: &Grid, label_row: usize, config: &ExtractorConfig) -> ColumnMap {
    let cells = grid.row(label_row);
    let find = |synonyms: &[String]| {
        cells
            .iter()
            .position(|c| c.as_text().is_some_and(|t| matches_label(t, synonyms)))
    };

    let labels = &config.columns;
    let name = find(&labels.name)
        .or_else(|| grid.used_columns().first().copied())
        .unwrap_or(0);
    ColumnMap {
        name,
        sets: find(&labels.sets),
        reps: find(&labels.reps),
        load: find(&labels.load),
        notes: find(&labels.notes),
        from_header: true,
    }
}
