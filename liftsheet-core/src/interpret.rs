//! Row interpretation: typed records from segmented rows

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticScope, Severity};
use crate::program::{ExerciseEntry, Load, Reps};
use crate::reader::{CellValue, Grid};
use crate::segment::{is_numeric_or_range, is_numeric_or_range_text, Block, BlockKind, ColumnMap, Segmentation};

/// One typed record produced from a row (or a blank gap).
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Exercise(ExerciseEntry),
    /// Label text of an explicit day-marker row.
    DayMarker(String),
    /// Hard boundary from two consecutive blank rows; the next exercise
    /// opens a fresh synthesized day.
    DayBreak,
}

/// Most recent non-blank name seen in the name column of the current
/// exercise block. Models merged-cell bleed: a merged name cell shows up
/// as one value followed by blanks, and the blank rows inherit it. Reset
/// at every block boundary.
#[derive(Debug, Default)]
struct NameCarry(Option<String>);

/// Interpret all rows of a segmented sheet into an ordered record stream.
///
/// A `columns` of `None` means the segmenter skipped the sheet; only an
/// empty stream comes back. Malformed rows (numbers but no usable name)
/// are skipped and reported, never fatal.
pub fn interpret_sheet(
    grid: &Grid,
    segmentation: &Segmentation,
    sheet_name: &str,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Record> {
    let Some(columns) = &segmentation.columns else {
        return Vec::new();
    };

    let mut records = Vec::new();
    for block in &segmentation.blocks {
        match block.kind {
            BlockKind::Header => {}
            BlockKind::Note => {
                if block.hard_break {
                    records.push(Record::DayBreak);
                }
            }
            BlockKind::Day => {
                for row_idx in block.rows() {
                    if let Some(label) = day_label(grid.row(row_idx)) {
                        records.push(Record::DayMarker(label));
                    }
                }
            }
            BlockKind::ExerciseGroup => {
                interpret_exercise_block(grid, block, columns, sheet_name, diagnostics, &mut records);
            }
        }
    }
    records
}

fn interpret_exercise_block(
    grid: &Grid,
    block: &Block,
    columns: &ColumnMap,
    sheet_name: &str,
    diagnostics: &mut Vec<Diagnostic>,
    records: &mut Vec<Record>,
) {
    let mut carry = NameCarry::default();
    for row_idx in block.rows() {
        match interpret_exercise_row(grid, row_idx, columns, &mut carry) {
            RowOutcome::Entry(entry) => records.push(Record::Exercise(entry)),
            RowOutcome::Malformed => diagnostics.push(Diagnostic::new(
                DiagnosticKind::MalformedRow,
                DiagnosticScope::Row(sheet_name.to_string(), row_idx),
                "row looks like an exercise but has no usable name; skipped",
                Severity::Warning,
            )),
            RowOutcome::Nothing => {}
        }
    }
}

enum RowOutcome {
    Entry(ExerciseEntry),
    Malformed,
    Nothing,
}

fn interpret_exercise_row(
    grid: &Grid,
    row_idx: usize,
    columns: &ColumnMap,
    carry: &mut NameCarry,
) -> RowOutcome {
    let name = match grid.cell(row_idx, columns.name) {
        CellValue::Text(t) if !is_numeric_or_range_text(t) => {
            carry.0 = Some(t.clone());
            Some(t.clone())
        }
        // Blank name cell: merged-cell bleed, inherit from the block.
        CellValue::Empty => carry.0.clone(),
        // A number is not a usable exercise name.
        _ => None,
    };

    let sets = columns.sets.and_then(|c| parse_sets(grid.cell(row_idx, c)));
    let reps = columns.reps.and_then(|c| parse_reps(grid.cell(row_idx, c)));
    let load = columns.load.and_then(|c| parse_load(grid.cell(row_idx, c)));
    let notes = columns
        .notes
        .and_then(|c| grid.cell(row_idx, c).as_text().map(str::to_string));

    let Some(name) = name else {
        // Numbers with nothing to name them is a malformed row; anything
        // else carries no information.
        let has_numbers = grid.row(row_idx).iter().any(is_numeric_or_range);
        return if has_numbers {
            RowOutcome::Malformed
        } else {
            RowOutcome::Nothing
        };
    };

    // A row only qualifies as an exercise with at least one of sets/reps;
    // a lone name updates the carry (it may span merged rows) but emits
    // nothing.
    if sets.is_none() && reps.is_none() {
        return RowOutcome::Nothing;
    }

    RowOutcome::Entry(ExerciseEntry {
        name,
        sets,
        reps,
        load,
        notes,
    })
}

fn parse_sets(cell: &CellValue) -> Option<u32> {
    match cell {
        CellValue::Number(n) if *n > 0.0 && n.fract() == 0.0 => Some(*n as u32),
        CellValue::Text(t) => t.parse::<u32>().ok().filter(|&n| n > 0),
        _ => None,
    }
}

fn parse_reps(cell: &CellValue) -> Option<Reps> {
    match cell {
        CellValue::Number(n) if n.fract() == 0.0 && *n >= 0.0 => Some(Reps::Count(*n as u32)),
        CellValue::Number(n) => Some(Reps::Text(n.to_string())),
        // Ranges and schemes ("8-12", "AMRAP", "to failure") verbatim.
        CellValue::Text(t) => match t.parse::<u32>() {
            Ok(count) => Some(Reps::Count(count)),
            Err(_) => Some(Reps::Text(t.clone())),
        },
        CellValue::Empty => None,
    }
}

fn parse_load(cell: &CellValue) -> Option<Load> {
    match cell {
        CellValue::Number(n) => Some(Load::Amount(*n)),
        CellValue::Text(t) => Some(Load::Text(t.clone())),
        CellValue::Empty => None,
    }
}

/// Label of a day-marker row: its non-empty text cells joined, so
/// "Day 1" | "Push" becomes "Day 1 Push".
fn day_label(cells: &[CellValue]) -> Option<String> {
    let parts: Vec<&str> = cells.iter().filter_map(CellValue::as_text).collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}
