//! liftsheet-core: extraction of structured workout programs from
//! spreadsheet workbooks
//!
//! Human-authored program spreadsheets are irregular: merged cells, blank
//! separator rows, inconsistent columns, labels buried in free text. This
//! library turns such workbooks into a Program tree (Program → Week → Day
//! → Exercise) plus a diagnostics list describing every inference it had
//! to make along the way.
//!
//! The pipeline is one-directional and single-pass: sheet classifier →
//! row segmenter → row interpreter → program assembler → JSON
//! serialization.

pub mod assemble;
pub mod classify;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod interpret;
pub mod program;
pub mod reader;
pub mod segment;
pub mod serialize;

use std::path::Path;

pub use config::ExtractorConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, DiagnosticScope, Severity};
pub use error::ExtractError;
pub use program::{Day, ExerciseEntry, Load, Program, Reps, Week};
pub use reader::{FileSource, MemorySource, WorkbookSource};

use assemble::Assembler;
use segment::RowTokens;

/// Result of one workbook extraction: the immutable Program plus every
/// diagnostic recorded while building it.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl Extraction {
    /// Number of rows skipped because they looked like exercises but had
    /// no usable name.
    pub fn malformed_row_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.kind == DiagnosticKind::MalformedRow)
            .count()
    }
}

/// Main extraction interface.
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Create an extractor with default conventions.
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    /// Create an extractor with custom conventions.
    pub fn with_config(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract the program from a workbook file.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<Extraction, ExtractError> {
        let path = path.as_ref();
        let mut source = FileSource::open(path)?;
        let program_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("program")
            .to_string();
        self.extract_source(&mut source, &program_name)
    }

    /// Extract the program from any workbook source.
    ///
    /// Fails only on fatal conditions (unreadable workbook, zero
    /// classifiable sheets); everything else is absorbed with a default
    /// and recorded in the returned diagnostics.
    pub fn extract_source<S: WorkbookSource>(
        &self,
        source: &mut S,
        program_name: &str,
    ) -> Result<Extraction, ExtractError> {
        let names = source.sheet_names();
        let selections = classify::classify_sheets(&names, &self.config)?;
        if selections.is_empty() {
            return Err(ExtractError::NoProgramSheets {
                workbook: program_name.to_string(),
            });
        }

        let tokens = RowTokens::compile(&self.config)?;
        let mut diagnostics = Vec::new();
        let mut assembler = Assembler::new(program_name);

        for selection in &selections {
            let grid = source.grid(&selection.name)?;
            let segmentation = segment::segment_sheet(&grid, &selection.name, &self.config, &tokens);
            diagnostics.extend(segmentation.diagnostics.iter().cloned());
            let records =
                interpret::interpret_sheet(&grid, &segmentation, &selection.name, &mut diagnostics);
            assembler.add_sheet(selection.week, &selection.name, records, &mut diagnostics);
        }

        // Stable sort: hierarchical scope order, encounter order within a
        // scope.
        diagnostics.sort_by(|a, b| a.scope.cmp(&b.scope));

        Ok(Extraction {
            program: assembler.finish(),
            diagnostics,
        })
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}
