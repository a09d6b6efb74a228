//! Error taxonomy for workbook extraction

use std::path::PathBuf;
use thiserror::Error;

/// Fatal extraction errors.
///
/// These abort the workbook they concern and nothing else; a batch caller
/// keeps processing sibling workbooks. Everything recoverable (fallback
/// column layouts, synthesized days, duplicate weeks, malformed rows) is
/// reported through [`crate::diagnostics::Diagnostic`] instead and never
/// surfaces here.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The workbook file could not be opened or parsed at all.
    #[error("failed to read workbook {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// No sheet name matched the week/master convention, so there is no
    /// program data to extract. No partial Program is produced.
    #[error("no program sheets found in {workbook}")]
    NoProgramSheets { workbook: String },

    /// A sheet reported by the source went missing when its grid was
    /// requested. Indicates a broken `WorkbookSource` implementation.
    #[error("sheet '{name}' not present in workbook")]
    MissingSheet { name: String },

    #[error("failed to read config {path}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A configured pattern (week token, day token) is not a valid regex.
    #[error("invalid pattern '{pattern}'")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
