use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use epochframe::{preprocess, EpochsConfig, EpochsTable, PipelineConfig, RefMode, Reference};

#[derive(Parser)]
#[command(name = "preproc", about = "QC, bad-epoch exclusion, re-reference and baseline for epoch tables")]
struct Args {
    /// Input epochs table (safetensors)
    #[arg(long)]
    input: PathBuf,

    /// Output epochs table (safetensors)
    #[arg(long)]
    output: PathBuf,

    /// Signal columns to transform (comma-separated)
    #[arg(long, value_delimiter = ',', required = true)]
    streams: Vec<String>,

    /// Quality column; epochs non-zero at the landing time are dropped
    #[arg(long)]
    bad_col: Option<String>,

    /// Reference column(s) (comma-separated)
    #[arg(long = "ref", value_delimiter = ',', requires = "ref_type")]
    reference: Vec<String>,

    /// linked_pair | new_common | common_average
    #[arg(long, requires = "reference")]
    ref_type: Option<String>,

    /// Baseline interval start (inclusive)
    #[arg(long, requires = "baseline_stop", allow_hyphen_values = true)]
    baseline_start: Option<i64>,

    /// Baseline interval stop (exclusive)
    #[arg(long, requires = "baseline_start", allow_hyphen_values = true)]
    baseline_stop: Option<i64>,

    /// Tolerance for the post-baseline interval mean (default: 1e-4)
    #[arg(long, default_value_t = epochframe::DEFAULT_ATOL)]
    atol: f64,

    /// Epoch id column
    #[arg(long, default_value = epochframe::EPOCH_ID)]
    epoch_id: String,

    /// Time stamp column
    #[arg(long, default_value = epochframe::TIME)]
    time: String,

    /// Time stamp at which bad-epoch codes are read
    #[arg(long, default_value_t = epochframe::DEFAULT_LANDING_TIME, allow_hyphen_values = true)]
    landing_time: i64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let epochs = EpochsConfig {
        epoch_id: args.epoch_id,
        time: args.time,
        atol: args.atol,
        landing_time: args.landing_time,
    };

    let table = EpochsTable::load_checked(&args.input, &epochs)?;
    println!("Loaded {} rows × {} columns", table.n_rows(), table.n_columns());

    let reference = match args.ref_type {
        Some(kind) => {
            let mode: RefMode = kind.parse()?;
            Some((Reference::from(args.reference), mode))
        }
        None => None,
    };

    let cfg = PipelineConfig {
        streams: args.streams,
        bad_col: args.bad_col,
        reference,
        baseline: args.baseline_start.zip(args.baseline_stop),
        epochs,
    };

    let out = preprocess(&table, &cfg).context("preprocessing epochs table")?;
    println!("Kept {} of {} rows", out.n_rows(), table.n_rows());

    out.save(&args.output)?;
    println!("Written → {}", args.output.display());

    Ok(())
}
