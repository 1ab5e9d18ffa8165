//! Grid index over catalog positions.
//!
//! Positions are bucketed on a linear RA/Dec grid whose cells are twice the
//! search radius on a side, anchored at the catalog's minimum RA and Dec.
//! A true neighbour within the radius of a query point therefore lies in the
//! query's cell or one of its eight neighbours, which turns an all-pairs scan
//! into a constant number of bucket reads per query.
//!
//! The grid does not apply the `cos(Dec)` correction: near the poles a cell
//! spans far less sky in RA than in Dec, and neighbours whose RA offset
//! exceeds one cell are missed. RA wrap-around at 0°/360° is not bridged
//! either. Catalogs in those regions should be matched with a larger radius
//! and filtered down afterwards.
//!
//! Buckets hold indices into the indexed slice, not references, so entries
//! can be removed as they are consumed without invalidating anything else.

use std::collections::HashMap;

use celestial_core::{Angle, Coordinate};

use crate::error::Result;
use crate::source::SourceEntry;

/// Integer grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelCell {
    pub ix: i64,
    pub iy: i64,
}

impl PixelCell {
    pub fn new(ix: i64, iy: i64) -> Self {
        Self { ix, iy }
    }

    /// The 3×3 block centred on this cell, row by row.
    ///
    /// Cells at the edge of the `i64` range clamp instead of wrapping, so the
    /// block may repeat a cell there.
    pub fn neighborhood(self) -> impl Iterator<Item = PixelCell> {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).map(move |dx| PixelCell::new(self.ix.saturating_add(dx), self.iy.saturating_add(dy)))
        })
    }
}

#[derive(Debug, Clone)]
pub struct CoordinateIndex {
    cells: HashMap<PixelCell, Vec<usize>>,
    min_ra: Angle,
    min_dec: Angle,
    cell_size: Angle,
    len: usize,
}

impl CoordinateIndex {
    /// Indexes `entries` for lookups within `radius`.
    ///
    /// # Errors
    ///
    /// Invalid-argument if `radius` is not finite and positive.
    pub fn build<S: SourceEntry>(entries: &[S], radius: Angle) -> Result<Self> {
        let radius = radius.validate_search_radius()?;
        let cell_size = radius * 2.0;

        let (min_ra, min_dec) = entries
            .iter()
            .map(SourceEntry::coordinate)
            .fold(None, |acc: Option<(Angle, Angle)>, c| match acc {
                None => Some((c.ra(), c.dec())),
                Some((ra, dec)) => Some((ra.min(c.ra()), dec.min(c.dec()))),
            })
            .unwrap_or((Angle::ZERO, Angle::ZERO));

        let mut index = Self {
            cells: HashMap::new(),
            min_ra,
            min_dec,
            cell_size,
            len: 0,
        };

        for (i, entry) in entries.iter().enumerate() {
            let cell = index.pixel(&entry.coordinate());
            index.cells.entry(cell).or_default().push(i);
        }
        index.len = entries.len();

        let polar = entries.iter().filter(|e| e.coordinate().is_near_pole()).count();
        if polar > 0 {
            log::warn!(
                "{} indexed entries lie within 1° of a pole; grid neighbourhoods may miss matches there",
                polar
            );
        }
        log::debug!(
            "indexed {} entries into {} cells of {:.3}\"",
            index.len,
            index.cells.len(),
            cell_size.arcseconds()
        );
        Ok(index)
    }

    pub fn pixel(&self, coord: &Coordinate) -> PixelCell {
        let ix = ((coord.ra() - self.min_ra) / self.cell_size).floor() as i64;
        let iy = ((coord.dec() - self.min_dec) / self.cell_size).floor() as i64;
        PixelCell::new(ix, iy)
    }

    /// Candidate indices for a query position.
    ///
    /// If the query's own cell has occupants only those are returned;
    /// otherwise the occupants of the whole 3×3 neighbourhood are concatenated.
    pub fn candidates(&self, coord: &Coordinate) -> Vec<usize> {
        let mut out = Vec::new();
        self.candidates_into(coord, &mut out);
        out
    }

    /// Same as [`candidates`](Self::candidates), reusing `out` (cleared first).
    pub fn candidates_into(&self, coord: &Coordinate, out: &mut Vec<usize>) {
        out.clear();
        let cell = self.pixel(coord);

        if let Some(own) = self.cells.get(&cell).filter(|occupants| !occupants.is_empty()) {
            out.extend_from_slice(own);
            return;
        }

        for neighbor in cell.neighborhood() {
            if let Some(occupants) = self.cells.get(&neighbor) {
                out.extend_from_slice(occupants);
            }
        }
    }

    /// Removes entry `index` (located at `coord`) from its bucket.
    ///
    /// Remaining occupants keep their order. Returns `false` if the entry
    /// was not in the index.
    pub fn remove(&mut self, index: usize, coord: &Coordinate) -> bool {
        let cell = self.pixel(coord);
        let Some(occupants) = self.cells.get_mut(&cell) else {
            return false;
        };
        let Some(pos) = occupants.iter().position(|&i| i == index) else {
            return false;
        };
        occupants.remove(pos);
        if occupants.is_empty() {
            self.cells.remove(&cell);
        }
        self.len -= 1;
        true
    }

    pub fn cell_size(&self) -> Angle {
        self.cell_size
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of entries still indexed.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceRecord;

    fn record(id: i64, ra: f64, dec: f64) -> SourceRecord {
        SourceRecord::new(id, Coordinate::from_degrees(ra, dec).unwrap())
    }

    fn at(ra: f64, dec: f64) -> Coordinate {
        Coordinate::from_degrees(ra, dec).unwrap()
    }

    fn one_arcsec() -> Angle {
        Angle::from_arcseconds(1.0)
    }

    #[test]
    fn test_empty_catalog_has_no_candidates() {
        let entries: Vec<SourceRecord> = vec![];
        let index = CoordinateIndex::build(&entries, one_arcsec()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.cell_count(), 0);
        assert!(index.candidates(&at(10.0, 0.0)).is_empty());
    }

    #[test]
    fn test_rejects_bad_radius() {
        let entries = vec![record(1, 10.0, 0.0)];
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = CoordinateIndex::build(&entries, Angle::from_arcseconds(bad)).unwrap_err();
            assert!(err.is_invalid_argument());
        }
    }

    #[test]
    fn test_cell_size_is_twice_radius() {
        let entries = vec![record(1, 10.0, 0.0)];
        let index = CoordinateIndex::build(&entries, one_arcsec()).unwrap();
        assert!((index.cell_size().arcseconds() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_pixel_is_anchored_at_minimum() {
        let entries = vec![record(1, 10.0, 0.0), record(2, 10.01, 0.01)];
        let index = CoordinateIndex::build(&entries, one_arcsec()).unwrap();
        assert_eq!(index.pixel(&at(10.0, 0.0)), PixelCell::new(0, 0));
        // 5 arcsec east, 1 arcsec north: cells of 2 arcsec
        let probe = at(10.0 + 5.0 / 3600.0, 1.0 / 3600.0);
        assert_eq!(index.pixel(&probe), PixelCell::new(2, 0));
        // below the anchor falls into negative cells
        let below = at(10.0 - 1.0 / 3600.0, -3.0 / 3600.0);
        assert_eq!(index.pixel(&below), PixelCell::new(-1, -2));
    }

    #[test]
    fn test_own_cell_occupants_shadow_neighbors() {
        // 0 and 1 share cell (0,0); 2 sits one cell east.
        let entries = vec![
            record(1, 10.0, 0.0),
            record(2, 10.0 + 0.5 / 3600.0, 0.0),
            record(3, 10.0 + 2.5 / 3600.0, 0.0),
        ];
        let index = CoordinateIndex::build(&entries, one_arcsec()).unwrap();
        assert_eq!(index.candidates(&at(10.0, 0.0)), vec![0, 1]);
    }

    #[test]
    fn test_empty_own_cell_falls_back_to_neighborhood() {
        let entries = vec![
            record(1, 10.0, 0.0),
            record(2, 10.0 + 4.5 / 3600.0, 0.0),
            record(3, 10.0 + 20.0 / 3600.0, 0.0),
        ];
        let index = CoordinateIndex::build(&entries, one_arcsec()).unwrap();
        // probe in cell (1,0): empty, neighbours (0,0) and (2,0) are occupied
        let probe = at(10.0 + 3.0 / 3600.0, 0.0);
        assert_eq!(index.pixel(&probe), PixelCell::new(1, 0));
        let mut found = index.candidates(&probe);
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn test_removal_empties_cell_and_reopens_neighborhood() {
        let entries = vec![record(1, 10.0, 0.0), record(2, 10.0 + 2.5 / 3600.0, 0.0)];
        let mut index = CoordinateIndex::build(&entries, one_arcsec()).unwrap();
        let probe = at(10.0, 0.0);
        assert_eq!(index.candidates(&probe), vec![0]);

        assert!(index.remove(0, &entries[0].coordinate()));
        assert!(!index.remove(0, &entries[0].coordinate()));
        assert_eq!(index.len(), 1);
        assert_eq!(index.candidates(&probe), vec![1]);
    }

    #[test]
    fn test_neighborhood_has_nine_cells() {
        let cells: Vec<_> = PixelCell::new(5, -2).neighborhood().collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], PixelCell::new(4, -3));
        assert_eq!(cells[4], PixelCell::new(5, -2));
        assert_eq!(cells[8], PixelCell::new(6, -1));
    }

    #[test]
    fn test_neighborhood_clamps_at_range_edge() {
        let cells: Vec<_> = PixelCell::new(i64::MAX, i64::MIN).neighborhood().collect();
        assert_eq!(cells.len(), 9);
        assert_eq!(cells[0], PixelCell::new(i64::MAX - 1, i64::MIN));
        assert_eq!(cells[8], PixelCell::new(i64::MAX, i64::MIN + 1));
    }

    #[test]
    fn test_tiny_radius_far_query_has_no_candidates() {
        let entries = vec![record(1, 10.0, 0.0)];
        let index = CoordinateIndex::build(&entries, Angle::from_radians(1e-300)).unwrap();
        let far = at(200.0, 10.0);
        assert_eq!(index.pixel(&far), PixelCell::new(i64::MAX, i64::MAX));
        assert!(index.candidates(&far).is_empty());
    }
}
