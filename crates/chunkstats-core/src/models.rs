use serde::{Deserialize, Serialize};

/// Cell contents that pandas treats as missing when reading CSV.
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "#N/A N/A", "#NA", "<NA>", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN",
];

/// Returns `true` when a raw CSV field counts as a missing value.
pub fn is_missing(raw: &str) -> bool {
    NA_TOKENS.contains(&raw.trim())
}

/// Inferred type of a column within a single window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Every non-missing cell parses as an `i64`.
    Integer,
    /// Every non-missing cell parses as an `f64`.
    Float,
    /// At least one non-missing cell is not a number.
    Text,
    /// Every cell in the window is missing.
    Empty,
}

impl ColumnKind {
    /// Whether the column takes part in the statistics snapshot.
    pub fn is_numeric(self) -> bool {
        !matches!(self, ColumnKind::Text)
    }
}

/// A single typed value in a window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Missing,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Numeric view of the cell; `None` for missing and text cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Integer(v) => Some(*v as f64),
            Cell::Float(v) if !v.is_nan() => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Float(v) => v.is_nan(),
            _ => false,
        }
    }
}

/// Name and inferred kind of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// A contiguous slice of source rows read in one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// 0-based chunk index.
    pub index: usize,
    /// Position of the first row among all data rows of the source.
    pub offset: usize,
    /// Columns in source order.
    pub columns: Vec<Column>,
    /// Typed rows; every row has one cell per column.
    pub rows: Vec<Vec<Cell>>,
}

impl Window {
    /// Number of rows in the window.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of `name` among the columns.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cells of column `idx`, top to bottom.
    pub fn column_cells(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Non-missing numeric values of column `idx`.
    pub fn numeric_values(&self, idx: usize) -> Vec<f64> {
        self.column_cells(idx).filter_map(Cell::as_f64).collect()
    }
}

/// Summary statistics for one numeric column of a window.
///
/// `mean`, `min` and `max` are NaN when `count` is 0; `std` is NaN when
/// `count` is below 2.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnStats {
    pub name: String,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

/// Per-column statistics for one window, in column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Chunk index of the window these statistics describe.
    pub chunk: usize,
    /// Numeric columns only.
    pub columns: Vec<ColumnStats>,
}

impl StatsSnapshot {
    /// Look up the statistics of a column by name.
    pub fn get(&self, name: &str) -> Option<&ColumnStats> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
