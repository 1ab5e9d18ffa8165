//! Greedy one-to-one matching.
//!
//! Primaries are visited in input order. Each one takes the closest
//! compatible secondary still available in its grid neighbourhood, and that
//! secondary is withdrawn from the index before the next primary is looked
//! at. Decisions are never revisited, so the outcome depends on input order
//! and is not a global optimum.
//!
//! Working sets are claimed bitmaps over the input slices; nothing is moved
//! or reallocated while matching, and the unmatched partitions come out in
//! input order.

use celestial_core::Angle;

use crate::error::{Error, Result};
use crate::index::CoordinateIndex;
use crate::observer::{MatchObserver, NullObserver};
use crate::result::MatchResult;
use crate::source::SourceEntry;

/// How the nearest candidate is chosen among a primary's neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CandidateSelection {
    /// The running closest distance is updated before the eligibility
    /// checks. A closer candidate that fails the radius or magnitude test
    /// still shadows farther candidates scanned after it.
    #[default]
    RunningBest,
    /// Only eligible candidates advance the running closest distance, so the
    /// nearest eligible candidate always wins.
    NearestEligible,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    pub radius: Angle,
    /// Largest accepted `|magnitude1|` difference when both sides carry photometry.
    pub magnitude_tolerance: f64,
    pub selection: CandidateSelection,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            radius: Angle::from_arcseconds(1.0),
            magnitude_tolerance: 1.0,
            selection: CandidateSelection::RunningBest,
        }
    }
}

impl MatchConfig {
    pub fn with_radius(radius: Angle) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    pub fn magnitude_tolerance(mut self, tolerance: f64) -> Self {
        self.magnitude_tolerance = tolerance;
        self
    }

    pub fn selection(mut self, selection: CandidateSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Checks the radius and tolerance, returning the validated radius.
    pub fn validate(&self) -> Result<Angle> {
        let radius = self.radius.validate_search_radius()?;
        if !self.magnitude_tolerance.is_finite() || self.magnitude_tolerance < 0.0 {
            return Err(Error::invalid_argument(format!(
                "magnitude tolerance must be finite and non-negative, got {}",
                self.magnitude_tolerance
            )));
        }
        Ok(radius)
    }
}

pub struct MatchEngine<'o> {
    config: MatchConfig,
    observer: &'o dyn MatchObserver,
}

impl MatchEngine<'static> {
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            observer: &NullObserver,
        }
    }
}

impl<'o> MatchEngine<'o> {
    pub fn with_observer<'n>(self, observer: &'n dyn MatchObserver) -> MatchEngine<'n> {
        MatchEngine {
            config: self.config,
            observer,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Matches `primary` against `secondary`.
    ///
    /// # Errors
    ///
    /// Invalid-argument if the radius is not finite and positive or the
    /// magnitude tolerance is negative or not finite.
    pub fn run<'a, P, S>(&self, primary: &'a [P], secondary: &'a [S]) -> Result<MatchResult<'a, P, S>>
    where
        P: SourceEntry,
        S: SourceEntry,
    {
        let radius = self.config.validate()?;

        let mut index = CoordinateIndex::build(secondary, radius)?;
        self.observer
            .on_index_built(index.len(), index.cell_count(), index.cell_size());

        let mut primary_claimed = vec![false; primary.len()];
        let mut secondary_claimed = vec![false; secondary.len()];
        let mut primary_matched = Vec::new();
        let mut secondary_matched = Vec::new();
        let mut candidates = Vec::new();

        for (pi, p) in primary.iter().enumerate() {
            index.candidates_into(&p.coordinate(), &mut candidates);
            let Some(si) = self.select(p, secondary, &candidates, radius) else {
                continue;
            };

            let s = &secondary[si];
            debug_assert!(!secondary_claimed[si], "secondary {} offered twice", si);
            index.remove(si, &s.coordinate());
            secondary_claimed[si] = true;
            primary_claimed[pi] = true;
            primary_matched.push(p);
            secondary_matched.push(s);
        }

        let result = MatchResult::from_parts(
            primary_matched,
            unclaimed(primary, &primary_claimed),
            secondary_matched,
            unclaimed(secondary, &secondary_claimed),
        );

        let summary = result.summary();
        log::debug!(
            "matched {} of {} primaries against {} secondaries ({:?})",
            summary.matched,
            primary.len(),
            secondary.len(),
            self.config.selection
        );
        self.observer.on_match_complete(radius, &summary);
        Ok(result)
    }

    fn select<P, S>(&self, p: &P, secondary: &[S], candidates: &[usize], radius: Angle) -> Option<usize>
    where
        P: SourceEntry,
        S: SourceEntry,
    {
        let origin = p.coordinate();
        let mut closest = Angle::from_radians(f64::INFINITY);
        let mut best = None;

        for &si in candidates {
            let s = &secondary[si];
            let distance = origin.distance_to(&s.coordinate());
            if distance > closest {
                continue;
            }

            let eligible = distance <= radius && self.magnitudes_compatible(p, s);
            match self.config.selection {
                CandidateSelection::RunningBest => {
                    closest = distance;
                    if eligible {
                        best = Some(si);
                    }
                }
                CandidateSelection::NearestEligible => {
                    if eligible {
                        closest = distance;
                        best = Some(si);
                    }
                }
            }
        }
        best
    }

    /// True unless both sides carry photometry and it disagrees.
    fn magnitudes_compatible<P: SourceEntry, S: SourceEntry>(&self, p: &P, s: &S) -> bool {
        match (p.as_magnitude(), s.as_magnitude()) {
            (Some(a), Some(b)) => {
                (a.magnitude1() - b.magnitude1()).abs() <= self.config.magnitude_tolerance
            }
            _ => true,
        }
    }
}

fn unclaimed<'a, E>(entries: &'a [E], claimed: &[bool]) -> Vec<&'a E> {
    entries
        .iter()
        .zip(claimed)
        .filter(|(_, taken)| !**taken)
        .map(|(e, _)| e)
        .collect()
}

/// Matches with default settings at `radius`.
pub fn cross_match<'a, P, S>(primary: &'a [P], secondary: &'a [S], radius: Angle) -> Result<MatchResult<'a, P, S>>
where
    P: SourceEntry,
    S: SourceEntry,
{
    MatchEngine::new(MatchConfig::with_radius(radius)).run(primary, secondary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::tests::RecordingObserver;
    use crate::source::SourceRecord;
    use celestial_core::Coordinate;
    use std::collections::HashSet;

    fn record(id: i64, ra: f64, dec: f64) -> SourceRecord {
        SourceRecord::new(id, Coordinate::from_degrees(ra, dec).unwrap())
    }

    fn ids<E: SourceEntry>(entries: &[&E]) -> Vec<i64> {
        entries.iter().map(|e| e.id()).collect()
    }

    fn one_arcsec() -> Angle {
        Angle::from_arcseconds(1.0)
    }

    fn scenario() -> (Vec<SourceRecord>, Vec<SourceRecord>) {
        let primary = vec![
            record(1, 10.0, 0.0).with_magnitude(15.0),
            record(2, 10.005, 0.0).with_magnitude(16.0),
        ];
        let secondary = vec![
            record(101, 10.00003, 0.0).with_magnitude(15.2),
            record(102, 10.00492, 0.0).with_magnitude(20.0),
        ];
        (primary, secondary)
    }

    // Deterministic scatter for the invariant checks.
    struct Lcg(u64);

    impl Lcg {
        fn next_f64(&mut self) -> f64 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            (self.0 >> 11) as f64 / (1u64 << 53) as f64
        }
    }

    fn scatter(seed: u64, count: usize, id_base: i64, with_mags: bool) -> Vec<SourceRecord> {
        let mut rng = Lcg(seed);
        (0..count)
            .map(|i| {
                let ra = 150.0 + rng.next_f64() * 0.01;
                let dec = 2.0 + rng.next_f64() * 0.01;
                let r = record(id_base + i as i64, ra, dec);
                if with_mags {
                    r.with_magnitude(14.0 + rng.next_f64() * 3.0)
                } else {
                    r
                }
            })
            .collect()
    }

    #[test]
    fn test_magnitude_gap_rejects_close_pair() {
        let (primary, secondary) = scenario();
        let result = cross_match(&primary, &secondary, one_arcsec()).unwrap();

        assert_eq!(result.match_count(), 1);
        let pairs: Vec<_> = result.pairs().map(|(p, s)| (p.id(), s.id())).collect();
        assert_eq!(pairs, vec![(1, 101)]);
        assert_eq!(ids(result.primary_unmatched()), vec![2]);
        assert_eq!(ids(result.secondary_unmatched()), vec![102]);

        let sep = result.separations()[0];
        assert!((sep.arcseconds() - 0.108).abs() < 1e-3);
    }

    #[test]
    fn test_both_selections_agree_on_scenario() {
        let (primary, secondary) = scenario();
        let config = MatchConfig::with_radius(one_arcsec()).selection(CandidateSelection::NearestEligible);
        let result = MatchEngine::new(config).run(&primary, &secondary).unwrap();
        assert_eq!(result.match_count(), 1);
    }

    #[test]
    fn test_wider_tolerance_accepts_second_pair() {
        let (primary, secondary) = scenario();
        let config = MatchConfig::with_radius(one_arcsec()).magnitude_tolerance(5.0);
        let result = MatchEngine::new(config).run(&primary, &secondary).unwrap();
        assert_eq!(result.match_count(), 2);
        assert!(result.primary_unmatched().is_empty());
    }

    #[test]
    fn test_magnitude_check_skipped_when_one_side_lacks_photometry() {
        let (primary, _) = scenario();
        let secondary = vec![record(101, 10.00003, 0.0), record(102, 10.00492, 0.0)];
        let result = cross_match(&primary, &secondary, one_arcsec()).unwrap();
        assert_eq!(result.match_count(), 2);
    }

    #[test]
    fn test_running_best_shadows_farther_eligible_candidate() {
        // The 0.2" neighbour is photometrically incompatible; the 0.6" one is fine.
        let primary = vec![record(1, 10.0, 0.0).with_magnitude(15.0)];
        let secondary = vec![
            record(101, 10.0 + 0.2 / 3600.0, 0.0).with_magnitude(20.0),
            record(102, 10.0 + 0.6 / 3600.0, 0.0).with_magnitude(15.1),
        ];

        let running = MatchEngine::new(MatchConfig::with_radius(one_arcsec()))
            .run(&primary, &secondary)
            .unwrap();
        assert_eq!(running.match_count(), 0);
        assert_eq!(ids(running.secondary_unmatched()), vec![101, 102]);

        let nearest = MatchEngine::new(
            MatchConfig::with_radius(one_arcsec()).selection(CandidateSelection::NearestEligible),
        )
        .run(&primary, &secondary)
        .unwrap();
        let pairs: Vec<_> = nearest.pairs().map(|(p, s)| (p.id(), s.id())).collect();
        assert_eq!(pairs, vec![(1, 102)]);
        assert_eq!(ids(nearest.secondary_unmatched()), vec![101]);
    }

    #[test]
    fn test_outside_radius_is_never_matched() {
        let primary = vec![record(1, 10.0, 0.0)];
        let secondary = vec![record(101, 10.0 + 1.5 / 3600.0, 0.0)];
        let result = cross_match(&primary, &secondary, one_arcsec()).unwrap();
        assert_eq!(result.match_count(), 0);
    }

    #[test]
    fn test_tiny_radius_with_distant_primary() {
        let primary = vec![record(1, 200.0, 10.0)];
        let secondary = vec![record(101, 10.0, 0.0)];
        let result = cross_match(&primary, &secondary, Angle::from_radians(1e-300)).unwrap();
        assert_eq!(result.match_count(), 0);
        assert_eq!(ids(result.primary_unmatched()), vec![1]);
        assert_eq!(ids(result.secondary_unmatched()), vec![101]);
    }

    #[test]
    fn test_secondary_is_used_once() {
        // Two primaries compete for the same secondary; the first one wins.
        let primary = vec![record(1, 10.0, 0.0), record(2, 10.0 + 0.1 / 3600.0, 0.0)];
        let secondary = vec![record(101, 10.0 + 0.05 / 3600.0, 0.0)];
        let result = cross_match(&primary, &secondary, one_arcsec()).unwrap();
        assert_eq!(ids(result.primary_matched()), vec![1]);
        assert_eq!(ids(result.primary_unmatched()), vec![2]);
        assert!(result.secondary_unmatched().is_empty());
    }

    #[test]
    fn test_empty_catalogs() {
        let some = vec![record(1, 10.0, 0.0)];
        let none: Vec<SourceRecord> = vec![];

        let r = cross_match(&none, &some, one_arcsec()).unwrap();
        assert_eq!(r.match_count(), 0);
        assert_eq!(ids(r.secondary_unmatched()), vec![1]);

        let r = cross_match(&some, &none, one_arcsec()).unwrap();
        assert_eq!(ids(r.primary_unmatched()), vec![1]);

        let r = cross_match(&none, &none, one_arcsec()).unwrap();
        assert_eq!(r.summary(), Default::default());
    }

    #[test]
    fn test_rejects_invalid_configuration() {
        let (primary, secondary) = scenario();
        for bad in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let err = cross_match(&primary, &secondary, Angle::from_arcseconds(bad)).unwrap_err();
            assert!(err.is_invalid_argument(), "radius {} accepted", bad);
        }

        let config = MatchConfig::default().magnitude_tolerance(-0.5);
        let err = MatchEngine::new(config).run(&primary, &secondary).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_partitions_cover_inputs_exactly() {
        let primary = scatter(7, 300, 0, true);
        let secondary = scatter(11, 250, 10_000, true);

        for arcsec in [0.5, 2.0, 5.0] {
            for selection in [CandidateSelection::RunningBest, CandidateSelection::NearestEligible] {
                let radius = Angle::from_arcseconds(arcsec);
                let config = MatchConfig::with_radius(radius).selection(selection);
                let result = MatchEngine::new(config).run(&primary, &secondary).unwrap();

                assert_eq!(result.primary_matched().len(), result.secondary_matched().len());
                assert_eq!(
                    result.primary_matched().len() + result.primary_unmatched().len(),
                    primary.len()
                );
                assert_eq!(
                    result.secondary_matched().len() + result.secondary_unmatched().len(),
                    secondary.len()
                );

                let matched: HashSet<i64> = ids(result.secondary_matched()).into_iter().collect();
                assert_eq!(matched.len(), result.match_count(), "secondary reused");
                assert!(ids(result.secondary_unmatched())
                    .iter()
                    .all(|id| !matched.contains(id)));

                for (p, s) in result.pairs() {
                    assert!(p.distance_to(s) <= radius);
                    let gap = p.as_magnitude().unwrap().magnitude1() - s.as_magnitude().unwrap().magnitude1();
                    assert!(gap.abs() <= 1.0);
                }
            }
        }
    }

    #[test]
    fn test_unmatched_keep_input_order() {
        let primary = scatter(3, 50, 0, false);
        let secondary = scatter(5, 50, 1000, false);
        let result = cross_match(&primary, &secondary, Angle::from_arcseconds(3.0)).unwrap();

        let p_ids = ids(result.primary_unmatched());
        assert!(p_ids.windows(2).all(|w| w[0] < w[1]));
        let s_ids = ids(result.secondary_unmatched());
        assert!(s_ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_observer_sees_index_and_summary() {
        let (primary, secondary) = scenario();
        let observer = RecordingObserver::default();
        let result = MatchEngine::new(MatchConfig::with_radius(one_arcsec()))
            .with_observer(&observer)
            .run(&primary, &secondary)
            .unwrap();

        assert_eq!(*observer.index_builds.lock().unwrap(), vec![(2, 2)]);
        assert_eq!(*observer.completions.lock().unwrap(), vec![result.summary()]);
    }
}
