//! Baseline centering: per-epoch, per-column interval mean removed.
//!
//! For every epoch `e` and signal column `c`:
//!
//! ```text
//!   μ[e, c]  = mean(x[e, c, t])  over  start <= t < stop
//!   x[e, c, t] -= μ[e, c]        for every t of the epoch
//! ```
//!
//! The interval is clamped to the time stamps present in the table. After the
//! subtraction the interval means are recomputed and must lie within
//! `atol` of zero.
use std::collections::HashMap;

use log::info;
use ndarray::Array1;

use crate::config::EpochsConfig;
use crate::error::{CenteringFailure, EpochsError, Result};
use crate::qc::{check, key_columns};
use crate::table::EpochsTable;

/// Clamp `[start, stop)` to the range of time stamps in `times`.
///
/// Returns `None` for an empty `times`.
pub fn clamp_interval(times: &Array1<i64>, start: i64, stop: i64) -> Option<(i64, i64)> {
    let first = times.iter().copied().min()?;
    let last = times.iter().copied().max()?;
    Some((start.max(first), stop.min(last)))
}

/// Row → epoch slot mapping plus the baseline window mask.
struct EpochWindows {
    slot_of_row: Vec<usize>,
    epochs: Vec<i64>,
    in_window: Vec<bool>,
    counts: Vec<usize>,
}

impl EpochWindows {
    fn new(epoch_ids: &Array1<i64>, times: &Array1<i64>, start: i64, stop: i64) -> Self {
        let mut slots: HashMap<i64, usize> = HashMap::new();
        let mut epochs = Vec::new();
        let slot_of_row: Vec<usize> = epoch_ids
            .iter()
            .map(|&e| {
                *slots.entry(e).or_insert_with(|| {
                    epochs.push(e);
                    epochs.len() - 1
                })
            })
            .collect();
        let in_window: Vec<bool> = times.iter().map(|&t| start <= t && t < stop).collect();

        let mut counts = vec![0usize; epochs.len()];
        for (&slot, &inside) in slot_of_row.iter().zip(&in_window) {
            if inside {
                counts[slot] += 1;
            }
        }
        Self { slot_of_row, epochs, in_window, counts }
    }

    /// First epoch with no rows inside the window.
    fn first_empty(&self) -> Option<i64> {
        self.counts
            .iter()
            .position(|&n| n == 0)
            .map(|slot| self.epochs[slot])
    }

    /// Interval mean of `values` for every epoch slot. Every slot must have
    /// a non-zero count.
    fn interval_means(&self, values: &Array1<f64>) -> Vec<f64> {
        let mut sums = vec![0.0_f64; self.epochs.len()];
        for ((&v, &slot), &inside) in values.iter().zip(&self.slot_of_row).zip(&self.in_window) {
            if inside {
                sums[slot] += v;
            }
        }
        sums.iter()
            .zip(&self.counts)
            .map(|(&s, &n)| s / n as f64)
            .collect()
    }
}

/// Center `signals` on their per-epoch mean over `[start, stop)`.
///
/// Runs [`check`] on the input and on the output. The input is not modified.
///
/// # Errors
///
/// Any QC failure, or [`EpochsError::Centering`] when an epoch has no rows in
/// the clamped interval or a recomputed interval mean exceeds `cfg.atol`.
///
/// # Examples
///
/// ```
/// use epochframe::{center, EpochsConfig, EpochsTable};
///
/// let table = EpochsTable::new()
///     .with_column("epoch_id", vec![1_i64, 1, 1]).unwrap()
///     .with_column("time", vec![0_i64, 1, 2]).unwrap()
///     .with_column("x", vec![10.0_f64, 10.0, 10.0]).unwrap();
///
/// let out = center(&table, &["x"], 0, 2, &EpochsConfig::default()).unwrap();
/// assert_eq!(out.float_values("x").unwrap().to_vec(), vec![0.0, 0.0, 0.0]);
/// ```
pub fn center<S: AsRef<str>>(
    table: &EpochsTable,
    signals: &[S],
    start: i64,
    stop: i64,
    cfg: &EpochsConfig,
) -> Result<EpochsTable> {
    check(table, signals, cfg)?;
    let (epoch_ids, times) = key_columns(table, cfg)?;

    let Some((start, stop)) = clamp_interval(times, start, stop) else {
        return Ok(table.clone());
    };

    let windows = EpochWindows::new(epoch_ids, times, start, stop);
    if let Some(epoch_id) = windows.first_empty() {
        return Err(EpochsError::Centering(CenteringFailure::EmptyInterval {
            epoch_id,
            start,
            stop,
        }));
    }

    let mut out = table.clone();
    for name in signals.iter().map(|s| s.as_ref()) {
        let values = table.float_values(name).ok_or_else(|| EpochsError::MissingColumns {
            missing: vec![name.to_string()],
        })?;
        let means = windows.interval_means(&values);
        let centered: Array1<f64> = values
            .iter()
            .zip(&windows.slot_of_row)
            .map(|(&v, &slot)| v - means[slot])
            .collect();

        let residuals = windows.interval_means(&centered);
        // Negated comparison so NaN residuals fail too.
        if let Some((slot, &mean)) = residuals
            .iter()
            .enumerate()
            .find(|(_, m)| !(m.abs() <= cfg.atol))
        {
            return Err(EpochsError::Centering(CenteringFailure::Residual {
                epoch_id: windows.epochs[slot],
                column: name.to_string(),
                mean,
                atol: cfg.atol,
            }));
        }
        out.replace_column(name, centered)?;
    }

    info!(
        "centered {} epochs x {} columns on [{start}, {stop}) within atol={:e}",
        windows.epochs.len(),
        signals.len(),
        cfg.atol
    );
    check(&out, signals, cfg)?;
    Ok(out)
}
