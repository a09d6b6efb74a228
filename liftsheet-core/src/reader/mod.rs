//! Workbook ingestion: file-backed and in-memory sources

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use crate::error::ExtractError;

pub mod workbook;

pub use workbook::{CellValue, Grid, Sheet};

/// Abstract workbook access.
///
/// The extraction pipeline only needs the ordered sheet names and a raw
/// grid per sheet; keeping this behind a trait lets tests and embedders
/// feed in-memory fixtures without touching the filesystem.
pub trait WorkbookSource {
    fn sheet_names(&self) -> Vec<String>;
    fn grid(&mut self, name: &str) -> Result<Grid, ExtractError>;
}

/// Calamine-backed source for XLSX/XLS/ODS files.
pub struct FileSource {
    sheets: Sheets<BufReader<File>>,
}

impl FileSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let sheets = open_workbook_auto(path).map_err(|source| ExtractError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { sheets })
    }
}

impl WorkbookSource for FileSource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.sheet_names().to_vec()
    }

    fn grid(&mut self, name: &str) -> Result<Grid, ExtractError> {
        let range = self
            .sheets
            .worksheet_range(name)
            .map_err(|_| ExtractError::MissingSheet {
                name: name.to_string(),
            })?;

        // Calamine ranges start at the first used cell, not A1. Pad with
        // empty rows/columns so grid indices equal spreadsheet indices.
        let (row_offset, col_offset) = match range.start() {
            Some((r, c)) => (r as usize, c as usize),
            None => return Ok(Grid::default()),
        };

        let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); row_offset];
        for raw_row in range.rows() {
            let mut row = vec![CellValue::Empty; col_offset];
            row.extend(raw_row.iter().map(convert_cell));
            rows.push(row);
        }
        Ok(Grid::new(rows))
    }
}

/// In-memory source built from pre-constructed sheets. Used by tests and
/// by callers that already hold grid data.
#[derive(Debug, Default)]
pub struct MemorySource {
    sheets: Vec<Sheet>,
}

impl MemorySource {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }
}

impl WorkbookSource for MemorySource {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn grid(&mut self, name: &str) -> Result<Grid, ExtractError> {
        self.sheets
            .iter()
            .find(|s| s.name == name)
            .map(|s| s.grid.clone())
            .ok_or_else(|| ExtractError::MissingSheet {
                name: name.to_string(),
            })
    }
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::text(s),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        // Error cells carry no program data
        Data::Error(_) => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_lookup() {
        let mut source = MemorySource::new(vec![Sheet::new(
            "Week 1 Master",
            Grid::new(vec![vec![CellValue::text("Squat")]]),
        )]);

        assert_eq!(source.sheet_names(), vec!["Week 1 Master".to_string()]);
        assert!(source.grid("Week 1 Master").is_ok());
        assert!(matches!(
            source.grid("Scratch"),
            Err(ExtractError::MissingSheet { .. })
        ));
    }

    #[test]
    fn test_convert_cell_types() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(
            convert_cell(&Data::String(" Deadlift ".to_string())),
            CellValue::Text("Deadlift".to_string())
        );
        assert_eq!(convert_cell(&Data::Float(3.0)), CellValue::Number(3.0));
        assert_eq!(convert_cell(&Data::Int(8)), CellValue::Number(8.0));
    }
}
