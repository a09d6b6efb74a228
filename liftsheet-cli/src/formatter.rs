//! Output formatters for extractions and diagnostics
//!
//! Everything renders into a `String` first; callers emit the rendered
//! report in one write, so reports from workbooks processed in parallel
//! never interleave.

use anyhow::Result;
use colored::*;
use liftsheet_core::{Diagnostic, DiagnosticScope, Extraction, Severity};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

/// JSON document written for one workbook: the program plus everything
/// the extractor had to infer along the way.
#[derive(Serialize)]
struct Report<'a> {
    program: &'a liftsheet_core::Program,
    diagnostics: &'a [Diagnostic],
}

pub fn to_json(extraction: &Extraction, pretty: bool) -> Result<String> {
    let report = Report {
        program: &extraction.program,
        diagnostics: &extraction.diagnostics,
    };
    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    Ok(json)
}

/// Render a human-readable program summary with colors.
pub fn render_human(file_path: &Path, extraction: &Extraction) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!("Program: {} ({})", extraction.program.name, file_path.display()).bold()
    );

    for week in &extraction.program.weeks {
        let _ = writeln!(out, "{}", format!("Week {}", week.week_number).cyan().bold());
        for day in &week.days {
            let _ = writeln!(out, "  {}", day.label.bold());
            for exercise in &day.exercises {
                let mut parts = vec![exercise.name.clone()];
                if let Some(sets) = exercise.sets {
                    parts.push(format!("{} sets", sets));
                }
                if let Some(reps) = &exercise.reps {
                    parts.push(format!("reps {}", format_reps(reps)));
                }
                let _ = writeln!(out, "    {}", parts.join("  "));
            }
        }
    }
    out
}

pub fn print_human(file_path: &Path, extraction: &Extraction) {
    print!("{}", render_human(file_path, extraction));
}

fn format_reps(reps: &liftsheet_core::Reps) -> String {
    match reps {
        liftsheet_core::Reps::Count(n) => n.to_string(),
        liftsheet_core::Reps::Text(t) => t.clone(),
    }
}

/// Render the diagnostics report, grouped book → sheet → row.
pub fn render_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();

    if diagnostics.is_empty() {
        let _ = writeln!(out, "{}", "✓ Nothing had to be inferred".green().bold());
        return out;
    }

    let mut book: Vec<&Diagnostic> = Vec::new();
    let mut by_sheet: BTreeMap<&str, Vec<&Diagnostic>> = BTreeMap::new();
    for diagnostic in diagnostics {
        match diagnostic.scope.sheet_name() {
            None => book.push(diagnostic),
            Some(sheet) => by_sheet.entry(sheet).or_default().push(diagnostic),
        }
    }

    for diagnostic in book {
        let _ = writeln!(out, "{}", format_diagnostic(diagnostic));
    }
    for (sheet, diagnostics) in by_sheet {
        let _ = writeln!(out, "{} {}", "Sheet:".bold(), sheet.cyan().bold());
        for diagnostic in diagnostics {
            let _ = writeln!(out, "  {}", format_diagnostic(diagnostic));
        }
    }
    out
}

/// Print the diagnostics report to stderr in one write.
pub fn print_diagnostics(diagnostics: &[Diagnostic]) {
    eprint!("{}", render_diagnostics(diagnostics));
}

fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let severity = match diagnostic.severity {
        Severity::Info => "info".blue(),
        Severity::Warning => "warning".yellow(),
    };
    let location = match &diagnostic.scope {
        DiagnosticScope::Row(_, row) => format!(" (row {})", row + 1),
        _ => String::new(),
    };
    format!("[{}] {}{}", severity, diagnostic.message, location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftsheet_core::{
        Day, DiagnosticKind, ExerciseEntry, Program, Week,
    };

    fn sample_extraction() -> Extraction {
        Extraction {
            program: Program {
                name: "block".to_string(),
                source_sheets: vec!["Week 1 Master".to_string()],
                weeks: vec![Week {
                    week_number: 1,
                    days: vec![Day {
                        label: "Day 1".to_string(),
                        exercises: vec![ExerciseEntry {
                            name: "Squat".to_string(),
                            sets: Some(5),
                            reps: Some(liftsheet_core::Reps::Count(5)),
                            load: None,
                            notes: None,
                        }],
                    }],
                }],
            },
            diagnostics: vec![
                Diagnostic::new(
                    DiagnosticKind::SynthesizedDay,
                    DiagnosticScope::Sheet("Week 1 Master".to_string()),
                    "no day marker before the first exercise",
                    Severity::Info,
                ),
                Diagnostic::new(
                    DiagnosticKind::MalformedRow,
                    DiagnosticScope::Row("Week 1 Master".to_string(), 4),
                    "numbers without a usable exercise name",
                    Severity::Warning,
                ),
            ],
        }
    }

    #[test]
    fn test_render_human_is_one_contiguous_report() {
        colored::control::set_override(false);
        let rendered = render_human(Path::new("block.xlsx"), &sample_extraction());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Program: block (block.xlsx)",
                "Week 1",
                "  Day 1",
                "    Squat  5 sets  reps 5",
            ]
        );
        assert!(rendered.ends_with('\n'));
    }

    #[test]
    fn test_render_diagnostics_groups_by_sheet() {
        colored::control::set_override(false);
        let rendered = render_diagnostics(&sample_extraction().diagnostics);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Sheet: Week 1 Master",
                "  [info] no day marker before the first exercise",
                "  [warning] numbers without a usable exercise name (row 5)",
            ]
        );
    }

    #[test]
    fn test_render_diagnostics_empty_reports_clean() {
        colored::control::set_override(false);
        let rendered = render_diagnostics(&[]);
        assert_eq!(rendered.trim(), "✓ Nothing had to be inferred");
    }
}
