//! Match-rate sensitivity to detection quality and search radius.
//!
//! A sweep runs the engine once at the base radius, then re-filters that
//! single result for every `(cutoff, radius)` cell: a pair survives when the
//! primary's signal-to-noise reaches the cutoff and the pair separation is
//! within the radius. Radii run from 0.1″ to 10.0″ in 0.1″ steps. Cells are
//! independent, so cutoff rows are filtered on the rayon pool and assembled
//! in cutoff order into an immutable [`SweepTable`].

use celestial_core::Angle;
use rayon::prelude::*;

use crate::engine::{MatchConfig, MatchEngine};
use crate::error::{Error, Result};
use crate::observer::{MatchObserver, NullObserver};
use crate::result::MatchResult;
use crate::source::SourceEntry;

pub const RADIUS_STEPS: usize = 100;
pub const RADIUS_STEP_ARCSEC: f64 = 0.1;

/// Radius keys closer than this to a step resolve to that step.
const RADIUS_MATCH_TOLERANCE_ARCSEC: f64 = 1e-6;

/// The sweep radii, ascending: 0.1″, 0.2″, … 10.0″.
pub fn sweep_radii() -> Vec<Angle> {
    (1..=RADIUS_STEPS)
        .map(|step| Angle::from_arcseconds(step as f64 * RADIUS_STEP_ARCSEC))
        .collect()
}

fn radius_step(radius: Angle) -> Option<usize> {
    let arcsec = radius.arcseconds();
    if !arcsec.is_finite() {
        return None;
    }
    let step = (arcsec / RADIUS_STEP_ARCSEC).round();
    if step < 1.0 || step > RADIUS_STEPS as f64 {
        return None;
    }
    let step = step as usize;
    let exact = step as f64 * RADIUS_STEP_ARCSEC;
    ((arcsec - exact).abs() <= RADIUS_MATCH_TOLERANCE_ARCSEC).then_some(step - 1)
}

fn meets_quality<P: SourceEntry>(entry: &P, cutoff: f64) -> bool {
    entry
        .as_signal_to_noise()
        .is_some_and(|q| q.signal_to_noise() >= cutoff)
}

pub struct ParameterSweep<'o> {
    config: MatchConfig,
    cutoffs: Vec<f64>,
    observer: &'o dyn MatchObserver,
}

impl ParameterSweep<'static> {
    /// `config.radius` is the base radius of the initial match.
    pub fn new(config: MatchConfig, cutoffs: &[f64]) -> Self {
        Self {
            config,
            cutoffs: cutoffs.to_vec(),
            observer: &NullObserver,
        }
    }
}

impl<'o> ParameterSweep<'o> {
    pub fn with_observer<'n>(self, observer: &'n dyn MatchObserver) -> ParameterSweep<'n> {
        ParameterSweep {
            config: self.config,
            cutoffs: self.cutoffs,
            observer,
        }
    }

    /// # Errors
    ///
    /// Invalid-argument for a non-finite cutoff, or anything the engine
    /// rejects in the base configuration.
    pub fn run<'a, P, S>(&self, primary: &'a [P], secondary: &'a [S]) -> Result<SweepTable<'a, P, S>>
    where
        P: SourceEntry,
        S: SourceEntry,
    {
        let cutoffs = distinct_cutoffs(&self.cutoffs)?;

        let base = MatchEngine::new(self.config)
            .with_observer(self.observer)
            .run(primary, secondary)?;
        let radii = sweep_radii();

        log::debug!(
            "sweeping {} cutoffs x {} radii over {} base matches",
            cutoffs.len(),
            radii.len(),
            base.match_count()
        );

        let rows: Vec<Vec<MatchResult<'a, P, S>>> = cutoffs
            .par_iter()
            .map(|&cutoff| {
                radii
                    .iter()
                    .map(|&radius| {
                        base.filter(|p, s| meets_quality(p, cutoff) && p.distance_to(s) <= radius)
                    })
                    .collect()
            })
            .collect();

        for (&cutoff, row) in cutoffs.iter().zip(&rows) {
            let counts: Vec<usize> = row.iter().map(MatchResult::match_count).collect();
            self.observer.on_sweep_row(cutoff, &counts);
        }

        Ok(SweepTable {
            base,
            cutoffs,
            radii,
            rows,
        })
    }
}

fn distinct_cutoffs(cutoffs: &[f64]) -> Result<Vec<f64>> {
    let mut out: Vec<f64> = Vec::with_capacity(cutoffs.len());
    for &cutoff in cutoffs {
        if !cutoff.is_finite() {
            return Err(Error::invalid_argument(format!(
                "quality cutoff must be finite, got {}",
                cutoff
            )));
        }
        if !out.contains(&cutoff) {
            out.push(cutoff);
        }
    }
    Ok(out)
}

/// Results of a sweep keyed by `(cutoff, radius)`.
#[derive(Debug)]
pub struct SweepTable<'a, P, S> {
    base: MatchResult<'a, P, S>,
    cutoffs: Vec<f64>,
    radii: Vec<Angle>,
    rows: Vec<Vec<MatchResult<'a, P, S>>>,
}

impl<'a, P: SourceEntry, S: SourceEntry> SweepTable<'a, P, S> {
    /// The unfiltered match at the base radius.
    pub fn base(&self) -> &MatchResult<'a, P, S> {
        &self.base
    }

    /// Distinct cutoffs in first-seen order.
    pub fn cutoffs(&self) -> &[f64] {
        &self.cutoffs
    }

    pub fn radii(&self) -> &[Angle] {
        &self.radii
    }

    pub fn get(&self, cutoff: f64, radius: Angle) -> Option<&MatchResult<'a, P, S>> {
        self.row(cutoff)?.get(radius)
    }

    pub fn row(&self, cutoff: f64) -> Option<SweepRow<'_, 'a, P, S>> {
        let position = self.cutoffs.iter().position(|&c| c == cutoff)?;
        Some(SweepRow {
            cutoff,
            radii: &self.radii,
            results: &self.rows[position],
        })
    }

    pub fn rows(&self) -> impl Iterator<Item = SweepRow<'_, 'a, P, S>> + '_ {
        self.cutoffs
            .iter()
            .zip(&self.rows)
            .map(|(&cutoff, results)| SweepRow {
                cutoff,
                radii: &self.radii,
                results,
            })
    }

    /// Match counts, one row per cutoff, one column per radius step.
    pub fn match_counts(&self) -> Vec<Vec<usize>> {
        self.rows().map(|row| row.match_counts()).collect()
    }
}

/// One cutoff's results across all radius steps.
#[derive(Debug)]
pub struct SweepRow<'t, 'a, P, S> {
    cutoff: f64,
    radii: &'t [Angle],
    results: &'t [MatchResult<'a, P, S>],
}

impl<'t, 'a, P: SourceEntry, S: SourceEntry> SweepRow<'t, 'a, P, S> {
    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn get(&self, radius: Angle) -> Option<&'t MatchResult<'a, P, S>> {
        self.results.get(radius_step(radius)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Angle, &'t MatchResult<'a, P, S>)> + 't {
        self.radii.iter().copied().zip(self.results.iter())
    }

    pub fn match_counts(&self) -> Vec<usize> {
        self.results.iter().map(MatchResult::match_count).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::tests::RecordingObserver;
    use crate::source::SourceRecord;
    use celestial_core::Coordinate;

    fn record(id: i64, ra: f64, dec: f64) -> SourceRecord {
        SourceRecord::new(id, Coordinate::from_degrees(ra, dec).unwrap())
    }

    fn arcsec(v: f64) -> Angle {
        Angle::from_arcseconds(v)
    }

    fn catalogs() -> (Vec<SourceRecord>, Vec<SourceRecord>) {
        let primary = vec![
            record(1, 10.0, 0.0).with_magnitude(15.0).with_signal_to_noise(12.0),
            record(2, 10.005, 0.0).with_magnitude(16.0).with_signal_to_noise(5.0),
        ];
        let secondary = vec![
            record(101, 10.00003, 0.0).with_magnitude(15.2),
            record(102, 10.00492, 0.0).with_magnitude(20.0),
        ];
        (primary, secondary)
    }

    #[test]
    fn test_radii_run_from_tenth_to_ten_arcsec() {
        let radii = sweep_radii();
        assert_eq!(radii.len(), 100);
        assert!((radii[0].arcseconds() - 0.1).abs() < 1e-9);
        assert!((radii[9].arcseconds() - 1.0).abs() < 1e-9);
        assert!((radii[99].arcseconds() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_radius_lookup_tolerance() {
        assert_eq!(radius_step(arcsec(1.0)), Some(9));
        assert_eq!(radius_step(arcsec(1.0 + 5e-7)), Some(9));
        assert_eq!(radius_step(arcsec(1.05)), None);
        assert_eq!(radius_step(arcsec(0.0)), None);
        assert_eq!(radius_step(arcsec(10.1)), None);
        assert_eq!(radius_step(arcsec(f64::NAN)), None);
    }

    #[test]
    fn test_quality_cutoffs_filter_base_match() {
        let (primary, secondary) = catalogs();
        let table = ParameterSweep::new(MatchConfig::with_radius(arcsec(1.0)), &[0.0, 10.0, 20.0])
            .run(&primary, &secondary)
            .unwrap();

        assert_eq!(table.base().match_count(), 1);
        assert_eq!(table.get(0.0, arcsec(1.0)).unwrap().match_count(), 1);
        assert_eq!(table.get(10.0, arcsec(1.0)).unwrap().match_count(), 1);
        assert!(table.row(20.0).unwrap().match_counts().iter().all(|&n| n == 0));

        // P1-S1 sits at 0.108": out of reach at the first step only
        assert_eq!(table.get(0.0, arcsec(0.1)).unwrap().match_count(), 0);
        assert_eq!(table.get(0.0, arcsec(0.2)).unwrap().match_count(), 1);
        assert_eq!(table.get(0.0, arcsec(10.0)).unwrap().match_count(), 1);
    }

    #[test]
    fn test_rejected_pairs_move_to_unmatched() {
        let (primary, secondary) = catalogs();
        let table = ParameterSweep::new(MatchConfig::with_radius(arcsec(1.0)), &[20.0])
            .run(&primary, &secondary)
            .unwrap();
        let cell = table.get(20.0, arcsec(1.0)).unwrap();
        assert_eq!(cell.primary_unmatched().len(), 2);
        assert_eq!(cell.secondary_unmatched().len(), 2);
    }

    #[test]
    fn test_entries_without_quality_fail_every_cutoff() {
        let primary = vec![record(1, 10.0, 0.0)];
        let secondary = vec![record(101, 10.00003, 0.0)];
        let table = ParameterSweep::new(MatchConfig::with_radius(arcsec(1.0)), &[f64::MIN])
            .run(&primary, &secondary)
            .unwrap();
        assert_eq!(table.base().match_count(), 1);
        assert_eq!(table.match_counts(), vec![vec![0; RADIUS_STEPS]]);
    }

    #[test]
    fn test_rejects_non_finite_cutoff() {
        let (primary, secondary) = catalogs();
        for bad in [f64::NAN, f64::INFINITY] {
            let err = ParameterSweep::new(MatchConfig::default(), &[0.0, bad])
                .run(&primary, &secondary)
                .unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn test_duplicate_cutoffs_kept_once() {
        let (primary, secondary) = catalogs();
        let table = ParameterSweep::new(MatchConfig::default(), &[10.0, 0.0, 10.0])
            .run(&primary, &secondary)
            .unwrap();
        assert_eq!(table.cutoffs(), &[10.0, 0.0]);
        assert_eq!(table.match_counts().len(), 2);
        assert!(table.get(5.0, arcsec(1.0)).is_none());
    }

    #[test]
    fn test_row_view_pairs_radii_with_results() {
        let (primary, secondary) = catalogs();
        let table = ParameterSweep::new(MatchConfig::default(), &[0.0])
            .run(&primary, &secondary)
            .unwrap();
        let row = table.row(0.0).unwrap();
        assert_eq!(row.cutoff(), 0.0);
        let entries: Vec<_> = row.iter().collect();
        assert_eq!(entries.len(), RADIUS_STEPS);
        assert!((entries[4].0.arcseconds() - 0.5).abs() < 1e-9);
        assert_eq!(entries[4].1.match_count(), 1);
        assert_eq!(table.rows().count(), 1);
    }

    #[test]
    fn test_observer_gets_rows_in_cutoff_order() {
        let (primary, secondary) = catalogs();
        let observer = RecordingObserver::default();
        ParameterSweep::new(MatchConfig::default(), &[20.0, 0.0])
            .with_observer(&observer)
            .run(&primary, &secondary)
            .unwrap();

        let rows = observer.rows.lock().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 20.0);
        assert_eq!(rows[1].0, 0.0);
        assert_eq!(rows[1].1[9], 1);
        assert_eq!(observer.completions.lock().unwrap().len(), 1);
    }
}
