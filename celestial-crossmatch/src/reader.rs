//! Delimited-text catalog reader.
//!
//! Lines starting with `#` and blank lines are ignored. The first remaining
//! line is the header; every later line is one row with exactly one value
//! per header column. Values are coerced with [`FieldValue::parse`], then the
//! mapped id / RA / Dec (degrees) columns build the row's position and the
//! optional quality and magnitude columns become capabilities.
//!
//! Rows are materialised on the rayon pool; row order and line numbers in
//! errors follow the input.

use std::path::Path;
use std::sync::Arc;

use celestial_core::Coordinate;
use rayon::prelude::*;

use crate::catalog::{FieldDictionary, SourceList};
use crate::error::{Error, Result};
use crate::source::{FieldValue, SourceRecord};

const COMMENT_PREFIX: char = '#';

/// Header names of the columns the reader interprets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: String,
    pub ra: String,
    pub dec: String,
    pub signal_to_noise: Option<String>,
    pub magnitude1: Option<String>,
    pub magnitude2: Option<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            ra: "ra".to_string(),
            dec: "dec".to_string(),
            signal_to_noise: None,
            magnitude1: None,
            magnitude2: None,
        }
    }
}

impl ColumnMap {
    pub fn with_signal_to_noise(mut self, column: impl Into<String>) -> Self {
        self.signal_to_noise = Some(column.into());
        self
    }

    pub fn with_magnitude(mut self, column: impl Into<String>) -> Self {
        self.magnitude1 = Some(column.into());
        self
    }

    pub fn with_magnitude2(mut self, column: impl Into<String>) -> Self {
        self.magnitude2 = Some(column.into());
        self
    }
}

struct ColumnIndices {
    id: usize,
    ra: usize,
    dec: usize,
    signal_to_noise: Option<usize>,
    magnitude1: Option<usize>,
    magnitude2: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct CatalogReader {
    columns: ColumnMap,
    delimiter: char,
}

impl Default for CatalogReader {
    fn default() -> Self {
        Self::new(ColumnMap::default())
    }
}

impl CatalogReader {
    pub fn new(columns: ColumnMap) -> Self {
        Self {
            columns,
            delimiter: ',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn read_path(&self, path: impl AsRef<Path>) -> Result<SourceList<SourceRecord>> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let list = self.read_str(&text)?;
        log::debug!("read {} rows from {}", list.len(), path.display());
        Ok(list)
    }

    /// # Errors
    ///
    /// [`Error::Parse`] for a missing header or mapped column, a row with the
    /// wrong number of values, or a value that does not fit its column;
    /// [`Error::InvalidArgument`] when rows disagree on which optional
    /// columns are filled.
    pub fn read_str(&self, text: &str) -> Result<SourceList<SourceRecord>> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| !line.trim().is_empty() && !line.starts_with(COMMENT_PREFIX));

        let (header_line, header) = lines
            .next()
            .ok_or_else(|| Error::parse(text.lines().count(), "no header row before end of input"))?;
        let dictionary = FieldDictionary::new(header.split(self.delimiter).map(str::trim))
            .map_err(|e| Error::parse(header_line, e.to_string()))?;
        let indices = self.resolve_columns(&dictionary, header_line)?;

        let rows: Vec<(usize, &str)> = lines.collect();
        let entries = rows
            .par_iter()
            .map(|&(line, raw)| self.parse_row(line, raw, &indices, dictionary.len()))
            .collect::<Result<Vec<_>>>()?;

        SourceList::new(Arc::new(dictionary), entries)
    }

    fn resolve_columns(&self, dictionary: &FieldDictionary, line: usize) -> Result<ColumnIndices> {
        let require = |name: &str| {
            dictionary
                .position(name)
                .ok_or_else(|| Error::parse(line, format!("missing column '{}'", name)))
        };
        let optional = |name: &Option<String>| name.as_deref().map(require).transpose();

        Ok(ColumnIndices {
            id: require(&self.columns.id)?,
            ra: require(&self.columns.ra)?,
            dec: require(&self.columns.dec)?,
            signal_to_noise: optional(&self.columns.signal_to_noise)?,
            magnitude1: optional(&self.columns.magnitude1)?,
            magnitude2: optional(&self.columns.magnitude2)?,
        })
    }

    fn parse_row(&self, line: usize, raw: &str, indices: &ColumnIndices, width: usize) -> Result<SourceRecord> {
        let fields: Vec<FieldValue> = raw.split(self.delimiter).map(FieldValue::parse).collect();
        if fields.len() != width {
            return Err(Error::parse(
                line,
                format!("expected {} values, found {}", width, fields.len()),
            ));
        }

        let id = fields[indices.id]
            .as_i64()
            .ok_or_else(|| Error::parse(line, format!("id '{}' is not an integer", fields[indices.id])))?;
        let ra = require_number(&fields, indices.ra, line, "ra")?;
        let dec = require_number(&fields, indices.dec, line, "dec")?;
        let coordinate = Coordinate::from_degrees(ra, dec).map_err(|e| Error::parse(line, e.to_string()))?;

        let signal_to_noise = optional_number(&fields, indices.signal_to_noise, line, "signal-to-noise")?;
        let magnitude1 = optional_number(&fields, indices.magnitude1, line, "magnitude")?;
        let magnitude2 = optional_number(&fields, indices.magnitude2, line, "second magnitude")?;

        let mut record = SourceRecord::new(id, coordinate);
        if let Some(snr) = signal_to_noise {
            record = record.with_signal_to_noise(snr);
        }
        if let Some(mag) = magnitude1 {
            record = record.with_magnitude(mag);
        }
        if let Some(mag) = magnitude2 {
            record = record.with_magnitude2(mag);
        }
        Ok(record.with_fields(fields))
    }
}

fn require_number(fields: &[FieldValue], column: usize, line: usize, what: &str) -> Result<f64> {
    optional_number(fields, Some(column), line, what)?
        .ok_or_else(|| Error::parse(line, format!("{} is missing", what)))
}

/// A blank cell is `None`; text is an error.
fn optional_number(fields: &[FieldValue], column: Option<usize>, line: usize, what: &str) -> Result<Option<f64>> {
    let Some(value) = column.map(|c| &fields[c]) else {
        return Ok(None);
    };
    match value {
        FieldValue::Missing => Ok(None),
        other => other
            .as_f64()
            .map(Some)
            .ok_or_else(|| Error::parse(line, format!("{} '{}' is not a number", what, other))),
    }
}
