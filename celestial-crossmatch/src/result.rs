//! Partitions produced by one matching run.
//!
//! A [`MatchResult`] holds four ordered lists borrowed from the input
//! catalogs: matched and unmatched primaries, matched and unmatched
//! secondaries. Matched lists are parallel: `primary_matched()[i]` was paired
//! with `secondary_matched()[i]`. Derived results ([`MatchResult::filter`],
//! [`MatchResult::restrict_to_bounds`]) are new values; a result is never
//! modified after construction.

use celestial_core::{Angle, Coordinate};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::source::SourceEntry;

/// Partition sizes of a [`MatchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct MatchSummary {
    pub matched: usize,
    pub primary_unmatched: usize,
    pub secondary_unmatched: usize,
}

/// Inclusive rectangle in RA/Dec.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyBounds {
    pub min_ra: Angle,
    pub max_ra: Angle,
    pub min_dec: Angle,
    pub max_dec: Angle,
}

impl SkyBounds {
    pub fn new(min_ra: Angle, max_ra: Angle, min_dec: Angle, max_dec: Angle) -> Self {
        Self {
            min_ra,
            max_ra,
            min_dec,
            max_dec,
        }
    }

    pub fn from_degrees(min_ra: f64, max_ra: f64, min_dec: f64, max_dec: f64) -> Self {
        Self::new(
            Angle::from_degrees(min_ra),
            Angle::from_degrees(max_ra),
            Angle::from_degrees(min_dec),
            Angle::from_degrees(max_dec),
        )
    }

    /// Smallest bound containing every coordinate, `None` for no coordinates.
    pub fn from_coordinates<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        coords.into_iter().fold(None, |acc, c| {
            Some(match acc {
                None => Self::new(c.ra(), c.ra(), c.dec(), c.dec()),
                Some(b) => Self::new(
                    b.min_ra.min(c.ra()),
                    b.max_ra.max(c.ra()),
                    b.min_dec.min(c.dec()),
                    b.max_dec.max(c.dec()),
                ),
            })
        })
    }

    pub fn contains(&self, coord: &Coordinate) -> bool {
        let (ra, dec) = (coord.ra(), coord.dec());
        ra >= self.min_ra && ra <= self.max_ra && dec >= self.min_dec && dec <= self.max_dec
    }
}

#[derive(Debug)]
pub struct MatchResult<'a, P, S> {
    primary_matched: Vec<&'a P>,
    primary_unmatched: Vec<&'a P>,
    secondary_matched: Vec<&'a S>,
    secondary_unmatched: Vec<&'a S>,
}

impl<P, S> Clone for MatchResult<'_, P, S> {
    fn clone(&self) -> Self {
        Self {
            primary_matched: self.primary_matched.clone(),
            primary_unmatched: self.primary_unmatched.clone(),
            secondary_matched: self.secondary_matched.clone(),
            secondary_unmatched: self.secondary_unmatched.clone(),
        }
    }
}

impl<'a, P: SourceEntry, S: SourceEntry> MatchResult<'a, P, S> {
    pub(crate) fn from_parts(
        primary_matched: Vec<&'a P>,
        primary_unmatched: Vec<&'a P>,
        secondary_matched: Vec<&'a S>,
        secondary_unmatched: Vec<&'a S>,
    ) -> Self {
        debug_assert_eq!(primary_matched.len(), secondary_matched.len());
        Self {
            primary_matched,
            primary_unmatched,
            secondary_matched,
            secondary_unmatched,
        }
    }

    fn empty() -> Self {
        Self::from_parts(Vec::new(), Vec::new(), Vec::new(), Vec::new())
    }

    pub fn primary_matched(&self) -> &[&'a P] {
        &self.primary_matched
    }

    pub fn primary_unmatched(&self) -> &[&'a P] {
        &self.primary_unmatched
    }

    pub fn secondary_matched(&self) -> &[&'a S] {
        &self.secondary_matched
    }

    pub fn secondary_unmatched(&self) -> &[&'a S] {
        &self.secondary_unmatched
    }

    pub fn match_count(&self) -> usize {
        self.primary_matched.len()
    }

    /// Matched pairs in match order.
    pub fn pairs(&self) -> impl ExactSizeIterator<Item = (&'a P, &'a S)> + '_ {
        self.primary_matched
            .iter()
            .copied()
            .zip(self.secondary_matched.iter().copied())
    }

    /// Great-circle separation of each matched pair, in match order.
    pub fn separations(&self) -> Vec<Angle> {
        self.pairs().map(|(p, s)| p.distance_to(s)).collect()
    }

    pub fn summary(&self) -> MatchSummary {
        MatchSummary {
            matched: self.match_count(),
            primary_unmatched: self.primary_unmatched.len(),
            secondary_unmatched: self.secondary_unmatched.len(),
        }
    }

    /// Re-classifies matched pairs.
    ///
    /// Pairs for which `predicate` holds stay matched in their original
    /// order; the rest are appended, in order, after the existing unmatched
    /// entries of each side.
    pub fn filter<F>(&self, predicate: F) -> Self
    where
        F: Fn(&P, &S) -> bool,
    {
        let mut primary_matched = Vec::with_capacity(self.match_count());
        let mut secondary_matched = Vec::with_capacity(self.match_count());
        let mut primary_unmatched = self.primary_unmatched.clone();
        let mut secondary_unmatched = self.secondary_unmatched.clone();

        for (p, s) in self.pairs() {
            if predicate(p, s) {
                primary_matched.push(p);
                secondary_matched.push(s);
            } else {
                primary_unmatched.push(p);
                secondary_unmatched.push(s);
            }
        }

        Self::from_parts(
            primary_matched,
            primary_unmatched,
            secondary_matched,
            secondary_unmatched,
        )
    }

    /// Keeps matched pairs with both ends inside `bounds`, and unmatched
    /// entries that are individually inside.
    pub fn restrict_to_bounds(&self, bounds: &SkyBounds) -> Self {
        let (primary_matched, secondary_matched): (Vec<_>, Vec<_>) = self
            .pairs()
            .filter(|(p, s)| bounds.contains(&p.coordinate()) && bounds.contains(&s.coordinate()))
            .unzip();

        Self::from_parts(
            primary_matched,
            retain_inside(&self.primary_unmatched, bounds),
            secondary_matched,
            retain_inside(&self.secondary_unmatched, bounds),
        )
    }

    /// [`restrict_to_bounds`](Self::restrict_to_bounds) with the bound spanned
    /// by the matched primaries. With no matches the bound is empty and so is
    /// the result.
    pub fn restrict_to_matched_bounds(&self) -> Self {
        match self.matched_bounds() {
            Some(bounds) => self.restrict_to_bounds(&bounds),
            None => Self::empty(),
        }
    }

    pub fn matched_bounds(&self) -> Option<SkyBounds> {
        SkyBounds::from_coordinates(self.primary_matched.iter().map(|p| p.coordinate()))
    }
}

fn retain_inside<'a, E: SourceEntry>(entries: &[&'a E], bounds: &SkyBounds) -> Vec<&'a E> {
    entries
        .iter()
        .copied()
        .filter(|e| bounds.contains(&e.coordinate()))
        .collect()
}
