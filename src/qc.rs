//! Structural quality control for long-format epoch tables.
//!
//! A table passes when it is a rectangular set of per-epoch time series:
//!
//! ```text
//!   time   0    1    2
//!   ─────────────────────
//!   ids  {1,2} {1,2} {1,2}   every slice holds the same epoch ids,
//!                            each at most once
//! ```
//!
//! Checks run in a fixed order and stop at the first violation.
use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use ndarray::Array1;

use crate::config::EpochsConfig;
use crate::error::{EpochsError, Result};
use crate::table::EpochsTable;

/// Confirm the epoch id and time columns exist.
pub fn validate_schema(table: &EpochsTable, cfg: &EpochsConfig) -> Result<()> {
    for (role, name) in [("epoch_id", &cfg.epoch_id), ("time", &cfg.time)] {
        if !table.has_column(name) {
            return Err(EpochsError::Schema { role, column: name.clone() });
        }
    }
    Ok(())
}

/// Schema check plus integer-typed keys. Returns `(epoch_ids, times)`.
pub(crate) fn key_columns<'a>(
    table: &'a EpochsTable,
    cfg: &EpochsConfig,
) -> Result<(&'a Array1<i64>, &'a Array1<i64>)> {
    validate_schema(table, cfg)?;
    let key = |role: &'static str, name: &str| {
        // Present: validate_schema passed.
        let col = table.column(name).ok_or_else(|| EpochsError::Schema {
            role,
            column: name.to_string(),
        })?;
        col.as_int().ok_or_else(|| EpochsError::ColumnType {
            role,
            column: name.to_string(),
            found: col.kind(),
        })
    };
    Ok((key("epoch_id", &cfg.epoch_id)?, key("time", &cfg.time)?))
}

/// Row positions grouped by time stamp, in ascending time order.
fn time_groups(times: &Array1<i64>) -> BTreeMap<i64, Vec<usize>> {
    let mut groups: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
    for (row, &t) in times.iter().enumerate() {
        groups.entry(t).or_default().push(row);
    }
    groups
}

/// Values occurring more than once, sorted.
fn duplicates<T: Ord + Clone>(seq: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut seen = BTreeSet::new();
    let mut twice = BTreeSet::new();
    for x in seq {
        if !seen.insert(x.clone()) {
            twice.insert(x);
        }
    }
    twice.into_iter().collect()
}

/// Verify `table` is a well-formed epoch table with `data_columns` present.
///
/// In order:
/// 1. every name in `data_columns` is non-empty;
/// 2. every name in `data_columns` is a column ([`EpochsError::MissingColumns`]);
/// 3. the epoch id and time columns exist ([`EpochsError::Schema`]) and hold
///    integers ([`EpochsError::ColumnType`]);
/// 4. no column name repeats, the two key names differ, and no data column
///    reuses a key name or another data column ([`EpochsError::DuplicateColumn`]);
/// 5. adjacent time slices hold identical epoch id sets
///    ([`EpochsError::Alignment`]), hence all slices do by transitivity;
/// 6. no epoch id repeats within any time slice
///    ([`EpochsError::DuplicateEntity`]).
///
/// Step 6 is separate from step 5 because equal sets do not imply equal
/// multisets.
///
/// Returns `table` itself on success.
pub fn check<'a, S: AsRef<str>>(
    table: &'a EpochsTable,
    data_columns: &[S],
    cfg: &EpochsConfig,
) -> Result<&'a EpochsTable> {
    if let Some(pos) = data_columns.iter().position(|c| c.as_ref().is_empty()) {
        return Err(EpochsError::InvalidArgument(format!(
            "data column at position {pos} has an empty name"
        )));
    }

    let missing: BTreeSet<String> = data_columns
        .iter()
        .map(|c| c.as_ref())
        .filter(|c| !table.has_column(c))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(EpochsError::MissingColumns { missing: missing.into_iter().collect() });
    }

    let (epoch_ids, times) = key_columns(table, cfg)?;

    let dup_columns = duplicates(table.column_names());
    if !dup_columns.is_empty() {
        return Err(EpochsError::DuplicateColumn {
            duplicates: dup_columns.into_iter().map(str::to_string).collect(),
        });
    }
    let axis_names = [cfg.epoch_id.as_str(), cfg.time.as_str()]
        .into_iter()
        .chain(data_columns.iter().map(|c| c.as_ref()));
    let dup_axes = duplicates(axis_names);
    if !dup_axes.is_empty() {
        return Err(EpochsError::DuplicateColumn {
            duplicates: dup_axes.into_iter().map(str::to_string).collect(),
        });
    }

    let groups = time_groups(times);
    debug!("qc: {} rows in {} time slices", table.n_rows(), groups.len());

    let mut prev: Option<(i64, BTreeSet<i64>)> = None;
    for (&t, rows) in &groups {
        let cur: BTreeSet<i64> = rows.iter().map(|&r| epoch_ids[r]).collect();
        if let Some((prev_t, prev_ids)) = &prev {
            if *prev_ids != cur {
                return Err(EpochsError::Alignment {
                    epoch_id: cfg.epoch_id.clone(),
                    time: t,
                    previous_time: *prev_t,
                    current: cur.into_iter().collect(),
                    previous: prev_ids.iter().copied().collect(),
                });
            }
        }
        prev = Some((t, cur));
    }

    for (&t, rows) in &groups {
        let dupes = duplicates(rows.iter().map(|&r| epoch_ids[r]));
        if !dupes.is_empty() {
            return Err(EpochsError::DuplicateEntity {
                epoch_id: cfg.epoch_id.clone(),
                time: t,
                duplicates: dupes,
            });
        }
    }

    Ok(table)
}
