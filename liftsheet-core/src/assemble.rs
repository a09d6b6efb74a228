//! Program assembly from interpreted record streams

use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticScope, Severity};
use crate::interpret::Record;
use crate::program::{Day, Program, Week};

/// Builds the Program tree from per-sheet record streams.
///
/// Never reorders anything: weeks follow sheet processing order, days and
/// exercises follow row order. Ambiguities (exercises before any day
/// marker, duplicate week numbers) are resolved with defensive defaults
/// and recorded as diagnostics.
#[derive(Debug)]
pub struct Assembler {
    program_name: String,
    weeks: Vec<Week>,
    /// Sheet that first populated each week, for duplicate reporting.
    week_origins: Vec<(u32, String)>,
    source_sheets: Vec<String>,
}

impl Assembler {
    pub fn new(program_name: impl Into<String>) -> Self {
        Self {
            program_name: program_name.into(),
            weeks: Vec::new(),
            week_origins: Vec::new(),
            source_sheets: Vec::new(),
        }
    }

    /// Append one sheet's records under the given week number.
    pub fn add_sheet(
        &mut self,
        week_number: u32,
        sheet_name: &str,
        records: Vec<Record>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        self.source_sheets.push(sheet_name.to_string());

        let week_idx = match self.weeks.iter().position(|w| w.week_number == week_number) {
            Some(idx) => {
                // Same week on two sheets: append, never overwrite.
                let origin = self
                    .week_origins
                    .iter()
                    .find(|(w, _)| *w == week_number)
                    .map(|(_, s)| s.as_str())
                    .unwrap_or("another sheet");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::DuplicateWeek,
                    DiagnosticScope::Sheet(sheet_name.to_string()),
                    format!(
                        "week {} already populated from '{}'; appending days from '{}'",
                        week_number, origin, sheet_name
                    ),
                    Severity::Warning,
                ));
                idx
            }
            None => {
                self.weeks.push(Week {
                    week_number,
                    days: Vec::new(),
                });
                self.week_origins
                    .push((week_number, sheet_name.to_string()));
                self.weeks.len() - 1
            }
        };

        let days = &mut self.weeks[week_idx].days;
        let mut has_current = false;
        let mut pending_break = false;

        for record in records {
            match record {
                Record::DayMarker(label) => {
                    days.push(Day {
                        label,
                        exercises: Vec::new(),
                    });
                    has_current = true;
                    pending_break = false;
                }
                Record::DayBreak => {
                    pending_break = true;
                }
                Record::Exercise(entry) => {
                    if pending_break {
                        has_current = false;
                        pending_break = false;
                    }
                    if !has_current {
                        let label = format!("Day {}", days.len() + 1);
                        diagnostics.push(Diagnostic::new(
                            DiagnosticKind::SynthesizedDay,
                            DiagnosticScope::Sheet(sheet_name.to_string()),
                            format!("exercises without a preceding day marker; synthesized '{label}'"),
                            Severity::Info,
                        ));
                        days.push(Day {
                            label,
                            exercises: Vec::new(),
                        });
                        has_current = true;
                    }
                    if let Some(day) = days.last_mut() {
                        day.exercises.push(entry);
                    }
                }
            }
        }
    }

    /// Consume the assembler and return the finished Program.
    pub fn finish(self) -> Program {
        Program {
            name: self.program_name,
            source_sheets: self.source_sheets,
            weeks: self.weeks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{ExerciseEntry, Reps};

    fn exercise(name: &str) -> Record {
        Record::Exercise(ExerciseEntry {
            name: name.to_string(),
            sets: Some(3),
            reps: Some(Reps::Count(10)),
            load: None,
            notes: None,
        })
    }

    #[test]
    fn test_days_follow_markers_in_order() {
        let mut diagnostics = Vec::new();
        let mut assembler = Assembler::new("test");
        assembler.add_sheet(
            1,
            "Week 1 Master",
            vec![
                Record::DayMarker("Day 1 Push".to_string()),
                exercise("Bench Press"),
                exercise("Overhead Press"),
                Record::DayMarker("Day 2 Pull".to_string()),
                exercise("Barbell Row"),
            ],
            &mut diagnostics,
        );
        let program = assembler.finish();

        assert_eq!(program.weeks.len(), 1);
        let days = &program.weeks[0].days;
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].label, "Day 1 Push");
        assert_eq!(
            days[0]
                .exercises
                .iter()
                .map(|e| e.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Bench Press", "Overhead Press"]
        );
        assert_eq!(days[1].exercises[0].name, "Barbell Row");
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_exercises_before_marker_synthesize_day_one() {
        let mut diagnostics = Vec::new();
        let mut assembler = Assembler::new("test");
        assembler.add_sheet(
            1,
            "Week 1 Master",
            vec![exercise("Squat")],
            &mut diagnostics,
        );
        let program = assembler.finish();

        assert_eq!(program.weeks[0].days[0].label, "Day 1");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::SynthesizedDay);
        assert_eq!(diagnostics[0].severity, Severity::Info);
    }

    #[test]
    fn test_day_break_starts_new_synthesized_day() {
        let mut diagnostics = Vec::new();
        let mut assembler = Assembler::new("test");
        assembler.add_sheet(
            1,
            "Week 1 Master",
            vec![
                Record::DayMarker("Day 1".to_string()),
                exercise("Bench Press"),
                Record::DayBreak,
                exercise("Squat"),
            ],
            &mut diagnostics,
        );
        let program = assembler.finish();

        let days = &program.weeks[0].days;
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].exercises[0].name, "Bench Press");
        assert_eq!(days[1].label, "Day 2");
        assert_eq!(days[1].exercises[0].name, "Squat");
    }

    #[test]
    fn test_trailing_day_break_adds_no_empty_day() {
        let mut diagnostics = Vec::new();
        let mut assembler = Assembler::new("test");
        assembler.add_sheet(
            1,
            "Week 1 Master",
            vec![
                Record::DayMarker("Day 1".to_string()),
                exercise("Bench Press"),
                Record::DayBreak,
            ],
            &mut diagnostics,
        );
        let program = assembler.finish();
        assert_eq!(program.weeks[0].days.len(), 1);
    }

    #[test]
    fn test_duplicate_week_appends_days() {
        let mut diagnostics = Vec::new();
        let mut assembler = Assembler::new("test");
        assembler.add_sheet(
            2,
            "Week 2 Master",
            vec![Record::DayMarker("Day 1".to_string()), exercise("Squat")],
            &mut diagnostics,
        );
        assembler.add_sheet(
            2,
            "WEEK 2 MASTER (2)",
            vec![Record::DayMarker("Day 1".to_string()), exercise("Deadlift")],
            &mut diagnostics,
        );
        let program = assembler.finish();

        assert_eq!(program.weeks.len(), 1);
        let days = &program.weeks[0].days;
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].exercises[0].name, "Squat");
        assert_eq!(days[1].exercises[0].name, "Deadlift");

        let dupes: Vec<_> = diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::DuplicateWeek)
            .collect();
        assert_eq!(dupes.len(), 1);
        assert!(dupes[0].message.contains("Week 2 Master"));
    }

    #[test]
    fn test_explicit_empty_day_is_kept() {
        let mut diagnostics = Vec::new();
        let mut assembler = Assembler::new("test");
        assembler.add_sheet(
            1,
            "Week 1 Master",
            vec![
                Record::DayMarker("Day 3 Rest".to_string()),
                Record::DayMarker("Day 4".to_string()),
                exercise("Squat"),
            ],
            &mut diagnostics,
        );
        let program = assembler.finish();
        let days = &program.weeks[0].days;
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].label, "Day 3 Rest");
        assert!(days[0].exercises.is_empty());
    }
}
