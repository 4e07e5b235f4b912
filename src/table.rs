//! Column-oriented epoch table.
//!
//! Long format: one row per (epoch, time) observation. Columns are ndarray
//! vectors aligned by row position. Key columns (epoch id, time) hold `i64`;
//! signal and flag columns may hold either `i64` or `f64`.
//!
//! Construction only enforces equal column lengths. Duplicate names and
//! misaligned epochs are representable on purpose so that
//! [`crate::qc::check`] can report them.
use ndarray::{Array1, Axis};

use crate::error::{EpochsError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Int(Array1<i64>),
    Float(Array1<f64>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Int(a) => a.len(),
            Column::Float(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short dtype label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Column::Int(_) => "int64",
            Column::Float(_) => "float64",
        }
    }

    pub fn as_int(&self) -> Option<&Array1<i64>> {
        match self {
            Column::Int(a) => Some(a),
            Column::Float(_) => None,
        }
    }

    /// Values widened to `f64` (copy).
    pub fn to_f64(&self) -> Array1<f64> {
        match self {
            Column::Int(a) => a.mapv(|v| v as f64),
            Column::Float(a) => a.clone(),
        }
    }

    /// True when the value at `row` equals zero.
    pub fn is_zero_at(&self, row: usize) -> bool {
        match self {
            Column::Int(a) => a[row] == 0,
            Column::Float(a) => a[row] == 0.0,
        }
    }

    fn select(&self, rows: &[usize]) -> Column {
        match self {
            Column::Int(a) => Column::Int(a.select(Axis(0), rows)),
            Column::Float(a) => Column::Float(a.select(Axis(0), rows)),
        }
    }
}

impl From<Vec<i64>> for Column {
    fn from(v: Vec<i64>) -> Self {
        Column::Int(Array1::from_vec(v))
    }
}

impl From<Vec<f64>> for Column {
    fn from(v: Vec<f64>) -> Self {
        Column::Float(Array1::from_vec(v))
    }
}

impl From<Array1<i64>> for Column {
    fn from(a: Array1<i64>) -> Self {
        Column::Int(a)
    }
}

impl From<Array1<f64>> for Column {
    fn from(a: Array1<f64>) -> Self {
        Column::Float(a)
    }
}

/// An ordered set of equal-length named columns.
///
/// ```
/// use epochframe::EpochsTable;
///
/// let table = EpochsTable::new()
///     .with_column("epoch_id", vec![1_i64, 1, 2, 2]).unwrap()
///     .with_column("time", vec![0_i64, 1, 0, 1]).unwrap()
///     .with_column("MiPf", vec![1.0_f64, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(table.n_rows(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EpochsTable {
    columns: Vec<(String, Column)>,
    n_rows: usize,
}

impl EpochsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column. The first column fixes the row count; later columns
    /// must match it. Names are not deduplicated.
    pub fn push_column(&mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<()> {
        let name = name.into();
        let column = column.into();
        if self.columns.is_empty() {
            self.n_rows = column.len();
        } else if column.len() != self.n_rows {
            return Err(EpochsError::LengthMismatch {
                column: name,
                expected: self.n_rows,
                found: column.len(),
            });
        }
        self.columns.push((name, column));
        Ok(())
    }

    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Result<Self> {
        self.push_column(name, column)?;
        Ok(self)
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|(n, _)| n == name)
    }

    /// First column called `name`.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn int_column(&self, name: &str) -> Option<&Array1<i64>> {
        self.column(name).and_then(Column::as_int)
    }

    /// Widened copy of column `name`.
    pub fn float_values(&self, name: &str) -> Option<Array1<f64>> {
        self.column(name).map(Column::to_f64)
    }

    /// Overwrite the first column called `name`, appending it if absent.
    pub fn replace_column(&mut self, name: &str, column: impl Into<Column>) -> Result<()> {
        let column = column.into();
        match self.columns.iter_mut().find(|(n, _)| n == name) {
            Some((_, slot)) => {
                if column.len() != self.n_rows {
                    return Err(EpochsError::LengthMismatch {
                        column: name.to_string(),
                        expected: self.n_rows,
                        found: column.len(),
                    });
                }
                *slot = column;
                Ok(())
            }
            None => self.push_column(name, column),
        }
    }

    /// New table holding `rows` (in the given order) of every column.
    pub fn take_rows(&self, rows: &[usize]) -> EpochsTable {
        EpochsTable {
            columns: self
                .columns
                .iter()
                .map(|(n, c)| (n.clone(), c.select(rows)))
                .collect(),
            n_rows: rows.len(),
        }
    }
}
