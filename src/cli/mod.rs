//! Command-line parsing for the conjoint utility estimator.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! estimation code. Arguments are converted into plain config structs in
//! `app`, so the library can be driven without a CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "conjoint", version, about = "Conjoint analysis part-worth utility estimator")]
pub struct Cli {
    /// Verbose logging (debug level) unless `RUST_LOG` is set.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Estimate aggregate, per-group and per-respondent utilities and write them as CSV.
    Estimate(EstimateArgs),
    /// Generate a synthetic design + survey pair (L9 orthogonal design).
    Sample(SampleArgs),
}

/// Column names of the survey table.
#[derive(Debug, Args, Clone)]
pub struct LayoutArgs {
    /// Respondent identifier column.
    #[arg(long, default_value = "ID")]
    pub id_column: String,

    /// Group column (e.g. phone platform).
    #[arg(long, default_value = "Brand")]
    pub group_column: String,

    /// Prefix of rating columns; the remainder of the name is the option index.
    #[arg(long, default_value = "QA_")]
    pub rating_prefix: String,
}

#[derive(Debug, Parser, Clone)]
pub struct EstimateArgs {
    /// Orthogonal design CSV (attributes as rows, option indices as columns).
    #[arg(long, value_name = "CSV")]
    pub design: PathBuf,

    /// Survey CSV (one row per respondent, one rating column per option).
    #[arg(long, value_name = "CSV")]
    pub survey: PathBuf,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Directory for the three utility tables.
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Write CSV without the UTF-8 byte-order mark.
    #[arg(long)]
    pub no_bom: bool,

    /// Also export the full report (schema, utilities, diagnostics) as JSON.
    #[arg(long, value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Also render per-group utilities as an SVG bar chart.
    #[arg(long, value_name = "SVG")]
    pub chart_svg: Option<PathBuf>,

    /// Disable the terminal bar chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Terminal chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,
}

#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Number of synthetic respondents.
    #[arg(short = 'n', long, default_value_t = 200)]
    pub respondents: usize,

    /// Random seed for reproducible studies.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Group values assigned uniformly at random (comma-separated).
    #[arg(long, value_delimiter = ',', default_value = "Android,iOS")]
    pub groups: Vec<String>,

    /// Probability that a respondent leaves an option unrated.
    #[arg(long, default_value_t = 0.05)]
    pub skip_prob: f64,

    /// Standard deviation of respondent-level part-worth noise.
    #[arg(long, default_value_t = 0.3)]
    pub respondent_sd: f64,

    /// Standard deviation of per-rating noise.
    #[arg(long, default_value_t = 0.7)]
    pub noise_sd: f64,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Directory for `design.csv` and `survey.csv`.
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Write CSV without the UTF-8 byte-order mark.
    #[arg(long)]
    pub no_bom: bool,
}
