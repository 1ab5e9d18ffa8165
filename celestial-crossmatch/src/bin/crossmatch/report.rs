//! Table, CSV and JSON rendering of match and sweep results

use crate::cli::OutputFormat;
use celestial_crossmatch::{MatchResult, MatchSummary, SourceEntry, SweepTable};
use serde::Serialize;

pub fn print_match<P, S>(result: &MatchResult<'_, P, S>, format: OutputFormat) -> anyhow::Result<()>
where
    P: SourceEntry,
    S: SourceEntry,
{
    match format {
        OutputFormat::Table => print_match_table(result),
        OutputFormat::Csv => print_match_csv(result),
        OutputFormat::Json => print_match_json(result)?,
    }
    Ok(())
}

pub fn print_sweep<P, S>(table: &SweepTable<'_, P, S>, format: OutputFormat) -> anyhow::Result<()>
where
    P: SourceEntry,
    S: SourceEntry,
{
    match format {
        OutputFormat::Table => print_sweep_table(table),
        OutputFormat::Csv => print_sweep_csv(table),
        OutputFormat::Json => print_sweep_json(table)?,
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonPair {
    primary_id: i64,
    secondary_id: i64,
    primary_ra_deg: f64,
    primary_dec_deg: f64,
    secondary_ra_deg: f64,
    secondary_dec_deg: f64,
    separation_arcsec: f64,
}

#[derive(Serialize)]
struct JsonMatch {
    summary: MatchSummary,
    pairs: Vec<JsonPair>,
    primary_unmatched: Vec<i64>,
    secondary_unmatched: Vec<i64>,
}

#[derive(Serialize)]
struct JsonSweep {
    base: MatchSummary,
    cutoffs: Vec<f64>,
    radii_arcsec: Vec<f64>,
    match_counts: Vec<Vec<usize>>,
}

fn json_pairs<P: SourceEntry, S: SourceEntry>(result: &MatchResult<'_, P, S>) -> Vec<JsonPair> {
    result
        .pairs()
        .map(|(p, s)| JsonPair {
            primary_id: p.id(),
            secondary_id: s.id(),
            primary_ra_deg: p.ra().degrees(),
            primary_dec_deg: p.dec().degrees(),
            secondary_ra_deg: s.ra().degrees(),
            secondary_dec_deg: s.dec().degrees(),
            separation_arcsec: p.distance_to(s).arcseconds(),
        })
        .collect()
}

fn print_match_table<P: SourceEntry, S: SourceEntry>(result: &MatchResult<'_, P, S>) {
    for (i, pair) in json_pairs(result).iter().enumerate() {
        println!(
            "{:4}: {:>20} <-> {:<20} RA={:.6}° Dec={:+.6}° Sep={:.3}\"",
            i + 1,
            pair.primary_id,
            pair.secondary_id,
            pair.primary_ra_deg,
            pair.primary_dec_deg,
            pair.separation_arcsec
        );
    }

    let summary = result.summary();
    if summary.matched == 0 {
        println!("No pairs matched.");
    }
    println!(
        "\nMatched: {}  Unmatched primary: {}  Unmatched secondary: {}",
        summary.matched, summary.primary_unmatched, summary.secondary_unmatched
    );
}

fn print_match_csv<P: SourceEntry, S: SourceEntry>(result: &MatchResult<'_, P, S>) {
    println!("primary_id,secondary_id,primary_ra_deg,primary_dec_deg,secondary_ra_deg,secondary_dec_deg,separation_arcsec");
    for pair in json_pairs(result) {
        println!(
            "{},{},{:.8},{:.8},{:.8},{:.8},{:.4}",
            pair.primary_id,
            pair.secondary_id,
            pair.primary_ra_deg,
            pair.primary_dec_deg,
            pair.secondary_ra_deg,
            pair.secondary_dec_deg,
            pair.separation_arcsec
        );
    }
}

fn print_match_json<P: SourceEntry, S: SourceEntry>(result: &MatchResult<'_, P, S>) -> anyhow::Result<()> {
    let report = JsonMatch {
        summary: result.summary(),
        pairs: json_pairs(result),
        primary_unmatched: result.primary_unmatched().iter().map(|e| e.id()).collect(),
        secondary_unmatched: result.secondary_unmatched().iter().map(|e| e.id()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_sweep_table<P: SourceEntry, S: SourceEntry>(table: &SweepTable<'_, P, S>) {
    let base = table.base().summary();
    println!(
        "Base match: {} pairs ({} / {} unmatched)\n",
        base.matched, base.primary_unmatched, base.secondary_unmatched
    );

    print!("{:>8}", "radius");
    for cutoff in table.cutoffs() {
        print!(" {:>10}", format!("snr>={}", cutoff));
    }
    println!();

    let counts = table.match_counts();
    for (step, radius) in table.radii().iter().enumerate() {
        print!("{:>7.1}\"", radius.arcseconds());
        for row in &counts {
            print!(" {:>10}", row[step]);
        }
        println!();
    }
}

fn print_sweep_csv<P: SourceEntry, S: SourceEntry>(table: &SweepTable<'_, P, S>) {
    println!("cutoff,radius_arcsec,match_count");
    for row in table.rows() {
        for (radius, result) in row.iter() {
            println!("{},{:.1},{}", row.cutoff(), radius.arcseconds(), result.match_count());
        }
    }
}

fn print_sweep_json<P: SourceEntry, S: SourceEntry>(table: &SweepTable<'_, P, S>) -> anyhow::Result<()> {
    let report = JsonSweep {
        base: table.base().summary(),
        cutoffs: table.cutoffs().to_vec(),
        radii_arcsec: table.radii().iter().map(|r| r.arcseconds()).collect(),
        match_counts: table.match_counts(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
