//! Raw workbook data structures

/// Cell value types after ingestion.
///
/// Spreadsheet cells collapse to a closed variant at the reader boundary so
/// the pipeline never re-checks dynamic types. Text is trimmed of
/// surrounding whitespace; whitespace-only text becomes `Empty`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Build a text cell, trimming whitespace. Whitespace-only input
    /// collapses to `Empty`.
    pub fn text(s: impl AsRef<str>) -> Self {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// Row-major grid of cell values for one sheet.
///
/// Row and column indices are 0-based and match the source spreadsheet
/// positions, so diagnostics can point at real rows.
#[derive(Debug, Clone, Default)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    /// Build a grid from raw strings and numbers, trimming text cells.
    /// Mostly useful for tests and in-memory sources.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = CellValue>,
    {
        Self {
            rows: rows.into_iter().map(|r| r.into_iter().collect()).collect(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cells of one row. Out-of-range rows read as empty.
    pub fn row(&self, idx: usize) -> &[CellValue] {
        self.rows.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cell at (row, col), `Empty` beyond the stored extent.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn is_blank_row(&self, idx: usize) -> bool {
        self.row(idx).iter().all(CellValue::is_empty)
    }

    /// Column indices that hold at least one non-empty cell, ascending.
    pub fn used_columns(&self) -> Vec<usize> {
        let n_cols = self.n_cols();
        (0..n_cols)
            .filter(|&c| self.rows.iter().any(|r| r.get(c).is_some_and(|v| !v.is_empty())))
            .collect()
    }
}

/// One named sheet with its raw grid.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub grid: Grid,
}

impl Sheet {
    pub fn new(name: impl Into<String>, grid: Grid) -> Self {
        Self {
            name: name.into(),
            grid,
        }
    }
}
