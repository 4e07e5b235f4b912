//! Error taxonomy for epoch-table QC and transforms.
//!
//! Every check fails fast: the first violation found is returned to the
//! caller with the offending column names or key values attached.
use thiserror::Error;

/// Why a baseline-centering pass was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CenteringFailure {
    /// No rows of this epoch fall inside `[start, stop)`.
    #[error("epoch {epoch_id} has no rows in the interval [{start}, {stop})")]
    EmptyInterval { epoch_id: i64, start: i64, stop: i64 },
    /// The recomputed interval mean is not within `atol` of zero.
    #[error("epoch {epoch_id} column {column}: interval mean {mean:e} exceeds atol {atol:e}")]
    Residual { epoch_id: i64, column: String, mean: f64, atol: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EpochsError {
    /// A required key column (epoch id or time) is absent.
    #[error("{role} column not found: {column}")]
    Schema { role: &'static str, column: String },

    /// A key column exists but does not hold integer keys.
    #[error("{role} column {column} must hold integer keys, found {found}")]
    ColumnType {
        role: &'static str,
        column: String,
        found: &'static str,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Declared data columns that are not columns of the table.
    #[error("data columns should all be present in the epochs table, the following are missing: {missing:?}")]
    MissingColumns { missing: Vec<String> },

    #[error("duplicate column names not allowed: {duplicates:?}")]
    DuplicateColumn { duplicates: Vec<String> },

    /// The set of epoch ids at `time` differs from the previous time slice.
    #[error(
        "snapshot {time} differs from previous snapshot {previous_time} in {epoch_id} index: \
         current {current:?}, previous {previous:?}"
    )]
    Alignment {
        epoch_id: String,
        time: i64,
        previous_time: i64,
        current: Vec<i64>,
        previous: Vec<i64>,
    },

    #[error("duplicate values of {epoch_id} in time group {time} not allowed: {duplicates:?}")]
    DuplicateEntity {
        epoch_id: String,
        time: i64,
        duplicates: Vec<i64>,
    },

    #[error("centering failed: {0}")]
    Centering(CenteringFailure),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("unknown reference type: {0}")]
    InvalidMode(String),

    /// No rows at the requested time value.
    #[error("no rows with {time} == {value}")]
    GroupNotFound { time: String, value: i64 },

    #[error("column {column} has {found} rows, table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },
}

pub type Result<T> = std::result::Result<T, EpochsError>;
