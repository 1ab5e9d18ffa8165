//! crossmatch: pair two point-source catalogs and study match rates
//!
//! Reads two delimited catalogs, matches them one-to-one within a radius,
//! and prints the pairs or a quality/radius sweep.

mod cli;
mod report;

use anyhow::Context;
use celestial_core::Angle;
use celestial_crossmatch::{
    CatalogReader, LogObserver, MatchConfig, MatchEngine, MatchObserver, NullObserver, ParameterSweep,
    SourceList, SourceRecord,
};
use clap::Parser;
use cli::{Cli, Commands, MatchArgs, MatchParams, SweepArgs};
use std::path::Path;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Commands::Match(args) => run_match(args, &cli),
        Commands::Sweep(args) => run_sweep(args, &cli),
    }
}

fn observer(cli: &Cli) -> &'static dyn MatchObserver {
    if cli.verbose {
        &LogObserver
    } else {
        &NullObserver
    }
}

fn load(path: &Path, reader: &CatalogReader) -> anyhow::Result<SourceList<SourceRecord>> {
    let list = reader
        .read_path(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    log::info!("Loaded {} entries from {}", list.len(), path.display());
    Ok(list)
}

fn load_both(params: &MatchParams, cli: &Cli) -> anyhow::Result<(SourceList<SourceRecord>, SourceList<SourceRecord>)> {
    let delimiter = cli.columns.delimiter;
    let primary = load(
        &params.primary,
        &CatalogReader::new(cli.columns.primary_map()).with_delimiter(delimiter),
    )?;
    let secondary = load(
        &params.secondary,
        &CatalogReader::new(cli.columns.secondary_map()).with_delimiter(delimiter),
    )?;
    Ok((primary, secondary))
}

fn config(params: &MatchParams) -> MatchConfig {
    MatchConfig::with_radius(Angle::from_arcseconds(params.radius))
        .magnitude_tolerance(params.mag_tolerance)
        .selection(params.selection.into())
}

fn run_match(args: &MatchArgs, cli: &Cli) -> anyhow::Result<()> {
    let (primary, secondary) = load_both(&args.params, cli)?;

    let mut result = MatchEngine::new(config(&args.params))
        .with_observer(observer(cli))
        .run(&primary, &secondary)
        .context("Matching failed")?;

    if args.restrict_to_matched_bounds {
        result = result.restrict_to_matched_bounds();
        log::info!("Restricted to matched bounds: {:?}", result.summary());
    }

    report::print_match(&result, args.params.format)
}

fn run_sweep(args: &SweepArgs, cli: &Cli) -> anyhow::Result<()> {
    let (primary, secondary) = load_both(&args.params, cli)?;
    if !primary.capabilities().signal_to_noise && !primary.is_empty() {
        log::warn!("Primary catalog has no signal-to-noise column; every cutoff will match nothing");
    }

    let table = ParameterSweep::new(config(&args.params), &args.cutoffs)
        .with_observer(observer(cli))
        .run(&primary, &secondary)
        .context("Sweep failed")?;

    report::print_sweep(&table, args.params.format)
}
