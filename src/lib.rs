//! # epochframe — QC and exact transforms for epoched EEG tables
//!
//! `epochframe` works on *long-format* epoch tables: one row per
//! (epoch, time) observation, where every epoch shares the same set of time
//! stamps. It proves a table is well formed, then applies per-epoch
//! transforms that keep it well formed.
//!
//! ## Pipeline overview
//!
//! ```text
//! epochs.safetensors
//!   │
//!   ├─ EpochsTable::load()    columns → ndarray vectors
//!   ├─ qc::check              keys present, aligned, unique per time slice
//!   ├─ epoch::drop_bad        epochs flagged at the landing time removed
//!   ├─ reference              linked pair / new common / common average
//!   ├─ baseline::center       per-epoch interval mean removed, verified ≈ 0
//!   └─ EpochsTable::save()
//! ```
//!
//! Every step takes `&EpochsTable` and returns a new table; inputs are never
//! modified. Every transform QCs its input and its output.
//!
//! ## Quick start
//!
//! ```
//! use epochframe::{center, check, EpochsConfig, EpochsTable};
//!
//! // Two epochs × three time stamps, one channel.
//! let table = EpochsTable::new()
//!     .with_column("epoch_id", vec![1_i64, 1, 1, 2, 2, 2]).unwrap()
//!     .with_column("time", vec![-1_i64, 0, 1, -1, 0, 1]).unwrap()
//!     .with_column("MiPf", vec![4.0_f64, 6.0, 9.0, 0.0, 2.0, 5.0]).unwrap();
//!
//! let cfg = EpochsConfig::default();
//! check(&table, &["MiPf"], &cfg).unwrap();
//!
//! // Baseline on the pre-stimulus sample [-1, 0).
//! let centered = center(&table, &["MiPf"], -1, 0, &cfg).unwrap();
//! assert_eq!(
//!     centered.float_values("MiPf").unwrap().to_vec(),
//!     vec![0.0, 2.0, 5.0, 0.0, 2.0, 5.0],
//! );
//! ```

pub mod baseline;
pub mod config;
pub mod epoch;
pub mod error;
pub mod io;
pub mod qc;
pub mod reference;
pub mod table;

use log::debug;

// ── Crate-root re-exports ─────────────────────────────────────────────────

// config
pub use config::{EpochsConfig, PipelineConfig, DEFAULT_ATOL, DEFAULT_LANDING_TIME, EPOCH_ID, TIME};

// error
pub use error::{CenteringFailure, EpochsError, Result};

// table
pub use table::{Column, EpochsTable};

// qc
pub use qc::{check, validate_schema};

// transforms
pub use baseline::{center, clamp_interval};
pub use epoch::{drop_bad, good_epochs};
pub use reference::{reference_signal, rereference, RefMode, Reference};

/// Run the configured steps on `table`, in order:
///
/// 1. [`drop_bad`] on [`PipelineConfig::bad_col`];
/// 2. [`rereference`] of [`PipelineConfig::streams`] with
///    [`PipelineConfig::reference`];
/// 3. [`center`] of the streams on [`PipelineConfig::baseline`].
///
/// Skipped steps leave the table as is. The returned table always passes
/// [`check`] for the configured streams.
///
/// # Examples
///
/// ```
/// use epochframe::{preprocess, EpochsTable, PipelineConfig, RefMode};
///
/// let table = EpochsTable::new()
///     .with_column("epoch_id", vec![1_i64, 1, 2, 2]).unwrap()
///     .with_column("time", vec![0_i64, 1, 0, 1]).unwrap()
///     .with_column("A2", vec![2.0_f64, 2.0, 2.0, 2.0]).unwrap()
///     .with_column("MiPf", vec![5.0_f64, 7.0, 1.0, 3.0]).unwrap()
///     .with_column("bad", vec![0_i64, 0, 1, 1]).unwrap();
///
/// let cfg = PipelineConfig {
///     streams: vec!["MiPf".into()],
///     bad_col: Some("bad".into()),
///     reference: Some(("A2".into(), RefMode::LinkedPair)),
///     ..PipelineConfig::default()
/// };
/// let out = preprocess(&table, &cfg).unwrap();
/// assert_eq!(out.float_values("MiPf").unwrap().to_vec(), vec![4.0, 6.0]);
/// ```
pub fn preprocess(table: &EpochsTable, cfg: &PipelineConfig) -> Result<EpochsTable> {
    let ecfg = &cfg.epochs;
    let mut data = check(table, &cfg.streams, ecfg)?.clone();

    if let Some(bad_col) = &cfg.bad_col {
        debug!("preprocess: dropping epochs flagged on {bad_col}");
        data = drop_bad(&data, bad_col, ecfg)?;
    }

    if let Some((reference, mode)) = &cfg.reference {
        debug!("preprocess: re-referencing ({mode})");
        data = rereference(&data, &cfg.streams, reference, *mode, ecfg)?;
    }

    if let Some((start, stop)) = cfg.baseline {
        debug!("preprocess: centering on [{start}, {stop})");
        data = center(&data, &cfg.streams, start, stop, ecfg)?;
    }

    check(&data, &cfg.streams, ecfg)?;
    Ok(data)
}
