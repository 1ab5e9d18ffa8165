//! CLI argument definitions for crossmatch

use celestial_crossmatch::{CandidateSelection, ColumnMap};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crossmatch")]
#[command(about = "Cross-match two point-source catalogs")]
#[command(version)]
pub struct Cli {
    /// Log progress at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub columns: ColumnArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Match two catalogs at one radius
    Match(MatchArgs),

    /// Match once, then count matches over quality cutoffs and 0.1"-10" radii
    Sweep(SweepArgs),
}

#[derive(Args)]
pub struct ColumnArgs {
    /// Field delimiter of both catalog files
    #[arg(long, global = true, default_value = ",")]
    pub delimiter: char,

    /// Integer identifier column
    #[arg(long, global = true, default_value = "id")]
    pub id_column: String,

    /// Right ascension column (degrees)
    #[arg(long, global = true, default_value = "ra")]
    pub ra_column: String,

    /// Declination column (degrees)
    #[arg(long, global = true, default_value = "dec")]
    pub dec_column: String,

    /// Signal-to-noise column of the primary catalog
    #[arg(long, global = true)]
    pub snr_column: Option<String>,

    /// Magnitude column used for the compatibility check (both catalogs)
    #[arg(long, global = true)]
    pub mag_column: Option<String>,

    /// Second magnitude column (both catalogs)
    #[arg(long, global = true)]
    pub mag2_column: Option<String>,
}

impl ColumnArgs {
    pub fn primary_map(&self) -> ColumnMap {
        ColumnMap {
            signal_to_noise: self.snr_column.clone(),
            ..self.secondary_map()
        }
    }

    pub fn secondary_map(&self) -> ColumnMap {
        ColumnMap {
            id: self.id_column.clone(),
            ra: self.ra_column.clone(),
            dec: self.dec_column.clone(),
            signal_to_noise: None,
            magnitude1: self.mag_column.clone(),
            magnitude2: self.mag2_column.clone(),
        }
    }
}

#[derive(Args)]
pub struct MatchParams {
    /// Primary catalog file
    pub primary: PathBuf,

    /// Secondary catalog file
    pub secondary: PathBuf,

    /// Search radius in arcseconds
    #[arg(long, default_value = "1.0")]
    pub radius: f64,

    /// Largest accepted magnitude difference when both catalogs have magnitudes
    #[arg(long, default_value = "1.0")]
    pub mag_tolerance: f64,

    /// Candidate selection rule
    #[arg(long, value_enum, default_value = "running-best")]
    pub selection: Selection,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

#[derive(Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub params: MatchParams,

    /// Keep only entries inside the RA/Dec box spanned by the matched primaries
    #[arg(long)]
    pub restrict_to_matched_bounds: bool,
}

#[derive(Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub params: MatchParams,

    /// Signal-to-noise cutoffs, comma separated
    #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
    pub cutoffs: Vec<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Selection {
    RunningBest,
    NearestEligible,
}

impl From<Selection> for CandidateSelection {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::RunningBest => CandidateSelection::RunningBest,
            Selection::NearestEligible => CandidateSelection::NearestEligible,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}
