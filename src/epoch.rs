//! Bad-epoch exclusion.
//!
//! Each epoch carries a QC code in a quality column. The code is read at the
//! landing time stamp (default `0`); epochs with a non-zero code there are
//! dropped at every time stamp.
use std::collections::HashSet;

use log::info;

use crate::config::EpochsConfig;
use crate::error::{EpochsError, Result};
use crate::qc::{check, key_columns};
use crate::table::EpochsTable;

/// Epoch ids whose `quality_col` value is zero at `cfg.landing_time`.
///
/// Fails with [`EpochsError::GroupNotFound`] when no row has that time stamp.
pub fn good_epochs(
    table: &EpochsTable,
    quality_col: &str,
    cfg: &EpochsConfig,
) -> Result<HashSet<i64>> {
    let (epoch_ids, times) = key_columns(table, cfg)?;
    let quality = table.column(quality_col).ok_or_else(|| EpochsError::MissingColumns {
        missing: vec![quality_col.to_string()],
    })?;

    let landing: Vec<usize> = times
        .iter()
        .enumerate()
        .filter(|&(_, &t)| t == cfg.landing_time)
        .map(|(row, _)| row)
        .collect();
    if landing.is_empty() {
        return Err(EpochsError::GroupNotFound {
            time: cfg.time.clone(),
            value: cfg.landing_time,
        });
    }

    Ok(landing
        .into_iter()
        .filter(|&row| quality.is_zero_at(row))
        .map(|row| epoch_ids[row])
        .collect())
}

/// Drop every epoch coded non-zero on `quality_col` at the landing time.
///
/// All rows of a kept epoch survive, in their original order. The result is
/// checked with [`check`] before it is returned.
///
/// ```
/// use epochframe::{drop_bad, EpochsConfig, EpochsTable};
///
/// let table = EpochsTable::new()
///     .with_column("epoch_id", vec![4_i64, 4, 5, 5]).unwrap()
///     .with_column("time", vec![0_i64, 1, 0, 1]).unwrap()
///     .with_column("bad", vec![0_i64, 0, 1, 0]).unwrap();
///
/// let good = drop_bad(&table, "bad", &EpochsConfig::default()).unwrap();
/// assert_eq!(good.int_column("epoch_id").unwrap().to_vec(), vec![4, 4]);
/// ```
pub fn drop_bad(table: &EpochsTable, quality_col: &str, cfg: &EpochsConfig) -> Result<EpochsTable> {
    let good = good_epochs(table, quality_col, cfg)?;
    let (epoch_ids, _) = key_columns(table, cfg)?;

    let rows: Vec<usize> = epoch_ids
        .iter()
        .enumerate()
        .filter(|&(_, &e)| good.contains(&e))
        .map(|(row, _)| row)
        .collect();
    let out = table.take_rows(&rows);

    info!(
        "kept {} epochs ({} of {} rows) with {quality_col} == 0 at {} == {}",
        good.len(),
        out.n_rows(),
        table.n_rows(),
        cfg.time,
        cfg.landing_time
    );
    check(&out, &[quality_col], cfg)?;
    Ok(out)
}
