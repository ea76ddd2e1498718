use std::{cmp::Ordering, path::PathBuf};

use thiserror::Error;

use crate::table::convert::{ConvertError, FromCell};

pub mod column;
pub mod convert;
pub mod csv_table;
pub mod filter;
pub mod row;

/// Error raised by a user-supplied filter predicate
pub type PredicateError = Box<dyn std::error::Error + Send + Sync>;

pub type Result<T, E = TableError> = std::result::Result<T, E>;

/// Error type used across the crate
#[derive(Debug, Error)]
pub enum TableError {
    #[error("No such file: {}", .path.display())]
    NotFound {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing header line")]
    MissingHeader,

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Row {index} out of range for {row_count} rows")]
    RowOutOfRange { index: usize, row_count: usize },

    #[error("Cannot convert {value:?} in column {column} row {row} to {target}: {source}")]
    Conversion {
        column: String,
        row: usize,
        value: String,
        target: &'static str,
        source: ConvertError,
    },

    #[error("Filter on column {column} failed at row {row}: {source}")]
    Predicate {
        column: String,
        row: usize,
        source: PredicateError,
    },
}

/// Options for parsing a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Lines starting with this character are skipped, before and after the header
    pub comment: Option<char>,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_comment(mut self, marker: char) -> Self {
        self.comment = Some(marker);
        self
    }

    pub(crate) fn is_comment(&self, line: &str) -> bool {
        self.comment.is_some_and(|marker| line.starts_with(marker))
    }
}

/// What a load consumed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_processed: usize,
    pub comments_skipped: usize,
    /// Rows that had more fields than columns; the extras were dropped
    pub rows_truncated: usize,
    /// Rows that had fewer fields than columns; the rest were filled with ""
    pub rows_padded: usize,
}

/// Comparison operand for [`FilterPredicate`]
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Cell is read as `i64`
    Int(i64),
    /// Cell is read as `f64`
    Float(f64),
    /// Cell is compared as text
    Str(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl Value {
    /// Orders `cell` against this value, converting the cell to the value's type.
    /// `None` when either side is NaN.
    fn compare_cell(&self, cell: &str) -> Result<Option<Ordering>, ConvertError> {
        Ok(match self {
            Value::Int(v) => Some(i64::from_cell(cell)?.cmp(v)),
            Value::Float(v) => f64::from_cell(cell)?.partial_cmp(v),
            Value::Str(v) => Some(cell.cmp(v.as_str())),
        })
    }
}

/// Built-in filter predicate, usable through
/// [`FilterSet::matching`](crate::FilterSet::matching)
#[derive(Debug, Clone, PartialEq)]
pub enum FilterPredicate {
    Equals(Value),
    NotEquals(Value),
    GreaterThan(Value),
    LessThan(Value),
    /// Inclusive on both ends
    Between(Value, Value),
}

impl FilterPredicate {
    /// Tests one cell. Fails when the cell does not convert to the operand's type.
    pub fn evaluate(&self, cell: &str) -> Result<bool, ConvertError> {
        use Ordering::*;

        Ok(match self {
            FilterPredicate::Equals(v) => v.compare_cell(cell)? == Some(Equal),
            FilterPredicate::NotEquals(v) => v.compare_cell(cell)? != Some(Equal),
            FilterPredicate::GreaterThan(v) => v.compare_cell(cell)? == Some(Greater),
            FilterPredicate::LessThan(v) => v.compare_cell(cell)? == Some(Less),
            FilterPredicate::Between(lo, hi) => {
                matches!(lo.compare_cell(cell)?, Some(Greater | Equal))
                    && matches!(hi.compare_cell(cell)?, Some(Less | Equal))
            }
        })
    }
}
