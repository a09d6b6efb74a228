//! Configuration for the extraction conventions

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ExtractError;

/// Extraction configuration.
///
/// Defaults mirror the authoring convention of the target spreadsheets:
/// one sheet per week named like "WEEK 1 MASTER", a header row labelling
/// the exercise/sets/reps/weight/notes columns, and "Day N" markers
/// between exercise groups. A `liftsheet.toml` can override any of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Case-insensitive regex locating the week number in a sheet name.
    /// Must contain one capture group for the number.
    pub week_pattern: String,
    /// Tokens marking a sheet as the authoritative copy for its week.
    pub master_markers: Vec<String>,
    /// Tokens that open a day-marker row ("Day", weekday names).
    pub day_tokens: Vec<String>,
    /// Header label synonyms per logical column.
    pub columns: ColumnLabels,
    /// Whether a headerless sheet falls back to the fixed column layout
    /// (name, sets, reps, load). Disabling this skips headerless sheets.
    pub fallback_columns: bool,
}

/// Recognized header labels for each logical column, lowercase.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnLabels {
    pub name: Vec<String>,
    pub sets: Vec<String>,
    pub reps: Vec<String>,
    pub load: Vec<String>,
    pub notes: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            week_pattern: r"week\s*(\d+)".to_string(),
            master_markers: vec!["master".to_string()],
            day_tokens: [
                "day", "monday", "tuesday", "wednesday", "thursday", "friday", "saturday",
                "sunday",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            columns: ColumnLabels::default(),
            fallback_columns: true,
        }
    }
}

impl Default for ColumnLabels {
    fn default() -> Self {
        Self {
            name: vec![
                "exercise".to_string(),
                "exercises".to_string(),
                "movement".to_string(),
                "lift".to_string(),
                "name".to_string(),
            ],
            sets: vec!["sets".to_string(), "set".to_string()],
            reps: vec![
                "reps".to_string(),
                "rep".to_string(),
                "repetitions".to_string(),
            ],
            load: vec![
                "weight".to_string(),
                "load".to_string(),
                "kg".to_string(),
                "lbs".to_string(),
            ],
            notes: vec![
                "notes".to_string(),
                "note".to_string(),
                "comments".to_string(),
            ],
        }
    }
}

impl ExtractorConfig {
    /// Load configuration from a TOML file. Unknown keys are rejected.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ExtractError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ExtractError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_labels_cover_required_columns() {
        let config = ExtractorConfig::default();
        assert!(config.columns.name.contains(&"exercise".to_string()));
        assert!(config.columns.sets.contains(&"sets".to_string()));
        assert!(config.columns.reps.contains(&"reps".to_string()));
        assert!(config.columns.load.contains(&"weight".to_string()));
        assert!(config.fallback_columns);
    }

    #[test]
    fn test_from_file_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
master_markers = ["master", "final"]

[columns]
load = ["belasting"]
"#
        )
        .unwrap();

        let config = ExtractorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.master_markers, vec!["master", "final"]);
        assert_eq!(config.columns.load, vec!["belasting"]);
        // untouched sections keep their defaults
        assert_eq!(config.week_pattern, r"week\s*(\d+)");
        assert!(config.columns.sets.contains(&"sets".to_string()));
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not_a_setting = true").unwrap();
        assert!(matches!(
            ExtractorConfig::from_file(file.path()),
            Err(ExtractError::ConfigParse { .. })
        ));
    }
}
