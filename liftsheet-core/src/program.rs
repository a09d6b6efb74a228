//! Assembled program structure and output schema

use serde::{Deserialize, Serialize};

/// Rep prescription for one exercise.
///
/// Pure integers are kept as numbers; ranges ("8-12") and schemes
/// ("AMRAP", "to failure") are kept verbatim as text. No semantic parsing
/// of ranges happens here; downstream consumers interpret the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
    Count(u32),
    Text(String),
}

/// Load/weight prescription: a plain number or free text like "70% 1RM".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Load {
    Amount(f64),
    Text(String),
}

/// One exercise row after interpretation.
///
/// Invariant: `name` is non-empty after trimming and at least one of
/// `sets`/`reps` is present; rows failing this never become entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<Reps>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<Load>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// One training day: a label plus its exercises in source-row order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    pub label: String,
    pub exercises: Vec<ExerciseEntry>,
}

/// One program week, 1-based week number from the sheet name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub week_number: u32,
    pub days: Vec<Day>,
}

/// Root of the extraction output. Owns all weeks, days and exercises
/// exclusively; immutable once assembled. Re-running extraction rebuilds
/// it from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub name: String,
    /// Names of the sheets the program was extracted from, in processing
    /// order.
    pub source_sheets: Vec<String>,
    pub weeks: Vec<Week>,
}

impl Program {
    pub fn total_exercises(&self) -> usize {
        self.weeks
            .iter()
            .flat_map(|w| &w.days)
            .map(|d| d.exercises.len())
            .sum()
    }

    pub fn total_days(&self) -> usize {
        self.weeks.iter().map(|w| w.days.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reps_untagged_serialization() {
        assert_eq!(serde_json::to_string(&Reps::Count(8)).unwrap(), "8");
        assert_eq!(
            serde_json::to_string(&Reps::Text("8-12".to_string())).unwrap(),
            "\"8-12\""
        );
    }

    #[test]
    fn test_absent_optionals_are_omitted() {
        let entry = ExerciseEntry {
            name: "Squat".to_string(),
            sets: Some(5),
            reps: None,
            load: None,
            notes: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"name":"Squat","sets":5}"#);
    }

    #[test]
    fn test_week_number_camel_case() {
        let week = Week {
            week_number: 2,
            days: vec![],
        };
        let json = serde_json::to_string(&week).unwrap();
        assert!(json.contains("\"weekNumber\":2"));
    }

    #[test]
    fn test_totals() {
        let program = Program {
            name: "p".to_string(),
            source_sheets: vec![],
            weeks: vec![Week {
                week_number: 1,
                days: vec![
                    Day {
                        label: "Day 1".to_string(),
                        exercises: vec![ExerciseEntry {
                            name: "Row".to_string(),
                            sets: Some(3),
                            reps: Some(Reps::Count(10)),
                            load: None,
                            notes: None,
                        }],
                    },
                    Day {
                        label: "Day 2".to_string(),
                        exercises: vec![],
                    },
                ],
            }],
        };
        assert_eq!(program.total_days(), 2);
        assert_eq!(program.total_exercises(), 1);
    }
}
