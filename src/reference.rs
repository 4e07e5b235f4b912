//! Re-referencing of common-reference EEG columns.
//!
//! Row-wise, for every signal column `x`:
//!
//! ```text
//!   linked_pair     x -= 0.5 · ref
//!   new_common      x -= ref
//!   common_average  x -= mean(ref_1 … ref_N)     N >= 2
//! ```
//!
//! The reference quantity is computed from the input table before any signal
//! column is rewritten, so reference columns may also be signal columns
//! (e.g. a common average over all streams).
use std::fmt;
use std::str::FromStr;

use log::info;
use ndarray::{Array1, Axis};

use crate::config::EpochsConfig;
use crate::error::{EpochsError, Result};
use crate::qc::check;
use crate::table::EpochsTable;

/// Reference column(s) for [`rereference`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    Single(String),
    Many(Vec<String>),
}

impl Reference {
    /// The single column name for pairwise modes. A one-element list counts
    /// as its only name.
    fn single(&self, mode: RefMode) -> Result<&str> {
        match self {
            Reference::Single(name) => Ok(name.as_str()),
            Reference::Many(names) if names.len() == 1 => Ok(names[0].as_str()),
            Reference::Many(names) => Err(EpochsError::InvalidReference(format!(
                "{mode} takes a single reference column, got {names:?}"
            ))),
        }
    }

    fn names(&self) -> Vec<&str> {
        match self {
            Reference::Single(name) => vec![name.as_str()],
            Reference::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for Reference {
    fn from(name: &str) -> Self {
        Reference::Single(name.to_string())
    }
}

impl From<String> for Reference {
    fn from(name: String) -> Self {
        Reference::Single(name)
    }
}

impl From<Vec<String>> for Reference {
    fn from(names: Vec<String>) -> Self {
        Reference::Many(names)
    }
}

impl From<&[&str]> for Reference {
    fn from(names: &[&str]) -> Self {
        Reference::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Reference {
    fn from(names: [&str; N]) -> Self {
        Reference::Many(names.iter().map(|s| s.to_string()).collect())
    }
}

/// How the reference quantity is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefMode {
    /// `x - 0.5 · ref`, e.g. A1 common reference to linked mastoids.
    LinkedPair,
    /// `x - ref`, e.g. A1 to a vertex or nose-tip reference.
    NewCommon,
    /// `x - mean(refs)` over two or more columns.
    CommonAverage,
}

impl FromStr for RefMode {
    type Err = EpochsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "linked_pair" => Ok(RefMode::LinkedPair),
            "new_common" => Ok(RefMode::NewCommon),
            "common_average" => Ok(RefMode::CommonAverage),
            other => Err(EpochsError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for RefMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefMode::LinkedPair => "linked_pair",
            RefMode::NewCommon => "new_common",
            RefMode::CommonAverage => "common_average",
        })
    }
}

fn reference_columns(table: &EpochsTable, names: &[&str]) -> Result<Vec<Array1<f64>>> {
    let missing: Vec<String> = names
        .iter()
        .filter(|n| !table.has_column(n))
        .map(|n| n.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(EpochsError::MissingColumns { missing });
    }
    Ok(names.iter().filter_map(|n| table.float_values(n)).collect())
}

/// Per-row reference quantity to subtract from every signal column.
pub fn reference_signal(
    table: &EpochsTable,
    reference: &Reference,
    mode: RefMode,
) -> Result<Array1<f64>> {
    match mode {
        RefMode::LinkedPair | RefMode::NewCommon => {
            let name = reference.single(mode)?;
            let mut cols = reference_columns(table, &[name])?;
            let col = cols.pop().ok_or_else(|| EpochsError::MissingColumns {
                missing: vec![name.to_string()],
            })?;
            Ok(if mode == RefMode::LinkedPair { col * 0.5 } else { col })
        }
        RefMode::CommonAverage => {
            let names = reference.names();
            if names.len() < 2 || names.iter().any(|n| n.is_empty()) {
                return Err(EpochsError::InvalidReference(format!(
                    "{mode} takes a list of two or more column names, got {names:?}"
                )));
            }
            let cols = reference_columns(table, &names)?;
            let views: Vec<_> = cols.iter().map(|c| c.view()).collect();
            let stacked = ndarray::stack(Axis(0), &views)
                .map_err(|e| EpochsError::InvalidReference(e.to_string()))?; // [N, rows]
            stacked
                .mean_axis(Axis(0))
                .ok_or_else(|| EpochsError::InvalidReference("empty reference list".into()))
        }
    }
}

/// Rewrite `signals` against a new reference.
///
/// Runs [`check`] on input and output. Row count, epoch ids and time stamps
/// are unchanged; only the signal columns are replaced (as `f64`).
///
/// ```
/// use epochframe::{rereference, EpochsConfig, EpochsTable, RefMode};
///
/// let table = EpochsTable::new()
///     .with_column("epoch_id", vec![1_i64]).unwrap()
///     .with_column("time", vec![0_i64]).unwrap()
///     .with_column("a", vec![2.0_f64]).unwrap()
///     .with_column("b", vec![4.0_f64]).unwrap()
///     .with_column("MiPf", vec![10.0_f64]).unwrap();
///
/// let out = rereference(
///     &table, &["MiPf"], &["a", "b"].into(), RefMode::CommonAverage,
///     &EpochsConfig::default(),
/// ).unwrap();
/// assert_eq!(out.float_values("MiPf").unwrap()[0], 7.0);
/// ```
pub fn rereference<S: AsRef<str>>(
    table: &EpochsTable,
    signals: &[S],
    reference: &Reference,
    mode: RefMode,
    cfg: &EpochsConfig,
) -> Result<EpochsTable> {
    check(table, signals, cfg)?;
    let new_ref = reference_signal(table, reference, mode)?;

    let mut out = table.clone();
    for name in signals.iter().map(|s| s.as_ref()) {
        let x = table.float_values(name).ok_or_else(|| EpochsError::MissingColumns {
            missing: vec![name.to_string()],
        })?;
        out.replace_column(name, x - &new_ref)?;
    }

    info!("re-referenced {} columns ({mode}, ref={:?})", signals.len(), reference.names());
    check(&out, signals, cfg)?;
    Ok(out)
}
