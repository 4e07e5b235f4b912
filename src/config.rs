//! Column-name defaults and run configuration.
//!
//! [`EpochsConfig`] carries the per-call knobs shared by every core
//! operation (key column names, centering tolerance, landing time).
//! [`PipelineConfig`] describes a full [`crate::preprocess`] run.
use crate::reference::{RefMode, Reference};

/// Default epoch id column.
pub const EPOCH_ID: &str = "epoch_id";
/// Default time stamp column.
pub const TIME: &str = "time";
/// Default absolute tolerance for the post-centering check.
pub const DEFAULT_ATOL: f64 = 1e-4;
/// Default time stamp at which bad-epoch flags are read.
pub const DEFAULT_LANDING_TIME: i64 = 0;

/// Settings shared by [`crate::check`], [`crate::center`],
/// [`crate::rereference`] and [`crate::drop_bad`].
///
/// ```
/// use epochframe::EpochsConfig;
///
/// let cfg = EpochsConfig {
///     epoch_id: "Epoch_idx".into(),
///     atol: 1e-6,
///     ..EpochsConfig::default()
/// };
/// assert_eq!(cfg.time, "time");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EpochsConfig {
    /// Column holding the epoch id of each row.
    ///
    /// Default: `"epoch_id"`.
    pub epoch_id: String,

    /// Column holding the time stamp of each row.
    ///
    /// Default: `"time"`.
    pub time: String,

    /// Absolute tolerance for interval means after centering.
    ///
    /// Default: `1e-4`.
    pub atol: f64,

    /// Time stamp whose rows carry the bad-epoch flags.
    ///
    /// Default: `0`.
    pub landing_time: i64,
}

impl Default for EpochsConfig {
    fn default() -> Self {
        Self {
            epoch_id: EPOCH_ID.to_string(),
            time: TIME.to_string(),
            atol: DEFAULT_ATOL,
            landing_time: DEFAULT_LANDING_TIME,
        }
    }
}

/// Steps of a [`crate::preprocess`] run. Each optional step is skipped when
/// `None`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PipelineConfig {
    /// Signal columns every step operates on.
    pub streams: Vec<String>,

    /// Quality column for the bad-epoch filter.
    pub bad_col: Option<String>,

    /// Reference columns and rewrite mode.
    pub reference: Option<(Reference, RefMode)>,

    /// Baseline interval `[start, stop)` for centering.
    pub baseline: Option<(i64, i64)>,

    pub epochs: EpochsConfig,
}
