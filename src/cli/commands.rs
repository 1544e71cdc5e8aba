// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the subcommands and their flags:
//   clean, filter-outliers, predict, describe, vocabulary
//
// The application layer never sees clap types; each *Args
// struct converts into its use-case config at this boundary.

use clap::{Args, Subcommand};

use crate::application::{
    clean_use_case::CleanConfig,
    outlier_use_case::{OutlierConfig, DEFAULT_OUTLIER_DAYS},
    predict_use_case::DEFAULT_MODEL_DIR,
};
use crate::domain::request::PredictionRequest;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Clean a raw listings file into a new JSON-lines file
    Clean(CleanArgs),

    /// Drop listings with the days_on_marked sentinel, in place
    FilterOutliers(OutlierArgs),

    /// Estimate a sale price with the saved linear model
    Predict(PredictArgs),

    /// Summarise columns of a listings file
    Describe(DescribeArgs),

    /// Print the months and agents the model knows
    Vocabulary,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Raw listings, one JSON object per line
    #[arg(long, default_value = "data/houses.jsonl")]
    pub input: String,

    /// Where the cleaned listings are written
    #[arg(long, default_value = "data/houses_cleaned.jsonl")]
    pub output: String,

    /// Newest acceptable build year (defaults to this year)
    #[arg(long)]
    pub current_year: Option<i32>,

    /// Keep sold listings only
    #[arg(long)]
    pub sold_only: bool,

    /// Append a CSV line per run to clean_runs.csv in this directory
    #[arg(long)]
    pub report_dir: Option<String>,
}

impl From<CleanArgs> for CleanConfig {
    fn from(a: CleanArgs) -> Self {
        CleanConfig {
            input:        a.input,
            output:       a.output,
            current_year: a.current_year,
            sold_only:    a.sold_only,
            report_dir:   a.report_dir,
        }
    }
}

#[derive(Args, Debug)]
pub struct OutlierArgs {
    /// Cleaned listings file, rewritten in place
    #[arg(long, default_value = "data/houses_cleaned.jsonl")]
    pub input: String,

    /// days_on_marked value that marks an outlier
    #[arg(long, default_value_t = DEFAULT_OUTLIER_DAYS)]
    pub days: f64,
}

impl From<OutlierArgs> for OutlierConfig {
    fn from(a: OutlierArgs) -> Self {
        OutlierConfig { input: a.input, days: a.days }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// Living area in m²
    #[arg(long)]
    pub size: f64,

    /// External storage in m²
    #[arg(long)]
    pub external_storage: f64,

    /// Lot width in metres
    #[arg(long)]
    pub lot_width: f64,

    /// Sale month, e.g. "jan" or "september"
    #[arg(long)]
    pub month: String,

    /// Agent identifier (see `vocabulary`)
    #[arg(long)]
    pub agent: String,

    /// Directory with price_model.json, price_model_bias.json and scalers.json
    #[arg(long, default_value = DEFAULT_MODEL_DIR)]
    pub model_dir: String,
}

impl From<&PredictArgs> for PredictionRequest {
    fn from(a: &PredictArgs) -> Self {
        PredictionRequest::new(a.size, a.external_storage, a.lot_width, &a.month, &a.agent)
    }
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Listings file to inspect
    #[arg(long, default_value = "data/houses_cleaned.jsonl")]
    pub input: String,

    /// List every column with a sample value
    #[arg(long)]
    pub list: bool,

    /// First column of a pair
    #[arg(long, requires = "y")]
    pub x: Option<String>,

    /// Second column of a pair
    #[arg(long, requires = "x")]
    pub y: Option<String>,

    /// Only look at the first N records
    #[arg(long)]
    pub limit: Option<usize>,
}
