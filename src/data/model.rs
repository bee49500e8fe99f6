use std::collections::BTreeSet;
use std::fmt;

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the raw table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from a spreadsheet or CSV.
/// Must be `Ord` because label encoding collects values into a `BTreeSet`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Infer a cell type from raw text. Empty text is `Null`.
    pub fn parse(s: &str) -> CellValue {
        let s = s.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Interpret the cell as a finite number, the way a lenient numeric
    /// conversion would. Text is trimmed and parsed; booleans become 1/0.
    /// Returns `None` when the cell cannot be read as a number.
    pub fn coerce_f64(&self) -> Option<f64> {
        let v = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Bool(b) => f64::from(u8::from(*b)),
            CellValue::String(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Null => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Text used when the cell appears in the header row.
    fn as_label(&self, position: usize) -> String {
        match self {
            CellValue::Null => format!("column_{position}"),
            other => other.to_string().trim().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – the loaded sheet after header normalisation
// ---------------------------------------------------------------------------

/// Column-labelled rows of cells. Every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Build a table, padding short rows with `Null` and truncating long ones.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        RawTable { columns, rows }
    }

    /// Build a table from an unlabelled grid: drop `metadata_rows` leading
    /// rows, take the next row as column labels, keep the rest as data.
    /// Data rows with no value at all are skipped. `None` if the grid ends
    /// before the header row.
    pub fn from_grid(grid: Vec<Vec<CellValue>>, metadata_rows: usize) -> Option<Self> {
        let mut rows = grid.into_iter().skip(metadata_rows);
        let header = rows.next()?;

        // The widest of header and data rows decides the column count, so a
        // value sitting past the last label is not silently dropped.
        let data: Vec<Vec<CellValue>> = rows
            .filter(|row| row.iter().any(|c| !c.is_null()))
            .collect();
        let width = data
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(header.len()))
            .max()
            .unwrap_or(0);

        let columns = (0..width)
            .map(|i| header.get(i).unwrap_or(&CellValue::Null).as_label(i))
            .collect();

        Some(RawTable::new(columns, data))
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Vec<CellValue>] {
        &mut self.rows
    }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    /// Sorted set of distinct non-null values in a column.
    pub fn unique_values(&self, column: usize) -> BTreeSet<CellValue> {
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .filter(|v| !v.is_null())
            .cloned()
            .collect()
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
