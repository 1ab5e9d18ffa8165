//! Ordered catalogs of source entries.
//!
//! A [`SourceList`] owns its entries and shares one [`FieldDictionary`]
//! (column names) with every row. Construction checks that each row carries
//! one value per column and that all rows expose the same capabilities, so
//! the matcher can rely on a catalog being homogeneous.

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use celestial_core::Coordinate;

use crate::error::{Error, Result};
use crate::source::{Capabilities, SourceEntry};

/// Column names of a catalog, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDictionary {
    names: Vec<String>,
    positions: HashMap<String, usize>,
}

impl FieldDictionary {
    /// Builds a dictionary. Duplicate names are rejected.
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            if positions.insert(name.clone(), idx).is_some() {
                return Err(Error::invalid_argument(format!(
                    "duplicate column name '{}'",
                    name
                )));
            }
        }
        Ok(Self { names, positions })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    pub fn name(&self, column: usize) -> Option<&str> {
        self.names.get(column).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

/// An ordered, indexable catalog.
#[derive(Debug, Clone)]
pub struct SourceList<E> {
    dictionary: Arc<FieldDictionary>,
    entries: Vec<E>,
    capabilities: Capabilities,
}

impl<E: SourceEntry> SourceList<E> {
    /// Wraps entries that carry no positional fields.
    pub fn from_entries(entries: Vec<E>) -> Result<Self> {
        Self::new(Arc::new(FieldDictionary::default()), entries)
    }

    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if a row's field count differs from the
    /// dictionary, or rows disagree on which capabilities they expose.
    pub fn new(dictionary: Arc<FieldDictionary>, entries: Vec<E>) -> Result<Self> {
        let capabilities = entries
            .first()
            .map(SourceEntry::capabilities)
            .unwrap_or_default();

        for (row, entry) in entries.iter().enumerate() {
            let count = entry.field_count();
            if count != dictionary.len() {
                return Err(Error::invalid_argument(format!(
                    "row {} (id {}) has {} fields, dictionary has {}",
                    row,
                    entry.id(),
                    count,
                    dictionary.len()
                )));
            }
            let caps = entry.capabilities();
            if caps != capabilities {
                return Err(Error::invalid_argument(format!(
                    "row {} (id {}) exposes {}, catalog exposes {}",
                    row,
                    entry.id(),
                    caps,
                    capabilities
                )));
            }
        }

        Ok(Self {
            dictionary,
            entries,
            capabilities,
        })
    }

    pub fn dictionary(&self) -> &Arc<FieldDictionary> {
        &self.dictionary
    }

    /// Capabilities shared by every row (all false for an empty catalog).
    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&E> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[E] {
        &self.entries
    }

    /// Min/max RA and Dec over the catalog, `None` when empty.
    pub fn bounding_box(&self) -> Option<(Coordinate, Coordinate)> {
        let mut iter = self.entries.iter().map(SourceEntry::coordinate);
        let first = iter.next()?;
        let (mut min_ra, mut max_ra) = (first.ra(), first.ra());
        let (mut min_dec, mut max_dec) = (first.dec(), first.dec());
        for c in iter {
            min_ra = min_ra.min(c.ra());
            max_ra = max_ra.max(c.ra());
            min_dec = min_dec.min(c.dec());
            max_dec = max_dec.max(c.dec());
        }
        let lo = Coordinate::new(min_ra, min_dec).ok()?;
        let hi = Coordinate::new(max_ra, max_dec).ok()?;
        Some((lo, hi))
    }
}

impl<E> Deref for SourceList<E> {
    type Target = [E];

    fn deref(&self) -> &[E] {
        &self.entries
    }
}

impl<'a, E> IntoIterator for &'a SourceList<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
