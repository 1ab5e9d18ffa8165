//! Catalog entries and their optional capabilities.
//!
//! Every entry has an identifier, a validated sky position and positional
//! field access. Some catalogs also carry a detection quality
//! (signal-to-noise) and some carry photometry (one or two magnitudes).
//! Those are exposed as capabilities: [`SourceEntry::as_signal_to_noise`] and
//! [`SourceEntry::as_magnitude`] return `None` when an entry type does not
//! provide them, and the matching code branches on that.
//!
//! [`SourceRecord`] is the general-purpose row type produced by
//! [`CatalogReader`](crate::reader::CatalogReader). Custom entry types only
//! need `id` and `coordinate`.

use std::fmt;

use celestial_core::{Angle, Coordinate};

/// Detection quality of an entry.
pub trait SignalToNoise {
    fn signal_to_noise(&self) -> f64;
}

/// Photometry of an entry. Lower is brighter.
pub trait Magnitude {
    fn magnitude1(&self) -> f64;

    fn magnitude2(&self) -> Option<f64> {
        None
    }
}

/// Which optional capabilities an entry exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub signal_to_noise: bool,
    pub magnitude: bool,
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.signal_to_noise, self.magnitude) {
            (true, true) => write!(f, "snr+magnitude"),
            (true, false) => write!(f, "snr"),
            (false, true) => write!(f, "magnitude"),
            (false, false) => write!(f, "position-only"),
        }
    }
}

/// A read-only catalog row.
pub trait SourceEntry: Send + Sync {
    fn id(&self) -> i64;

    fn coordinate(&self) -> Coordinate;

    fn ra(&self) -> Angle {
        self.coordinate().ra()
    }

    fn dec(&self) -> Angle {
        self.coordinate().dec()
    }

    /// All typed field values of the row, in column order.
    fn fields(&self) -> &[FieldValue] {
        &[]
    }

    fn field(&self, column: usize) -> Option<&FieldValue> {
        self.fields().get(column)
    }

    fn field_count(&self) -> usize {
        self.fields().len()
    }

    fn as_signal_to_noise(&self) -> Option<&dyn SignalToNoise> {
        None
    }

    fn as_magnitude(&self) -> Option<&dyn Magnitude> {
        None
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            signal_to_noise: self.as_signal_to_noise().is_some(),
            magnitude: self.as_magnitude().is_some(),
        }
    }

    fn distance_to(&self, other: &dyn SourceEntry) -> Angle {
        self.coordinate().distance_to(&other.coordinate())
    }
}

/// A typed catalog cell.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Missing,
}

impl FieldValue {
    /// Coerces raw text: integer first, then float, then text. Blank is [`Missing`](Self::Missing).
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::Missing;
        }
        if let Ok(v) = raw.parse::<i64>() {
            return Self::Integer(v);
        }
        if let Ok(v) = raw.parse::<f64>() {
            return Self::Real(v);
        }
        Self::Text(raw.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Real(v) => Some(*v),
            Self::Text(_) | Self::Missing => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Real(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) => write!(f, "{}", v),
            Self::Text(s) => write!(f, "{}", s),
            Self::Missing => Ok(()),
        }
    }
}

/// General-purpose catalog row.
///
/// Capabilities are present exactly when the corresponding value was set.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    id: i64,
    coordinate: Coordinate,
    fields: Vec<FieldValue>,
    signal_to_noise: Option<f64>,
    magnitude1: Option<f64>,
    magnitude2: Option<f64>,
}

impl SourceRecord {
    pub fn new(id: i64, coordinate: Coordinate) -> Self {
        Self {
            id,
            coordinate,
            fields: Vec::new(),
            signal_to_noise: None,
            magnitude1: None,
            magnitude2: None,
        }
    }

    pub fn with_fields(mut self, fields: Vec<FieldValue>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_signal_to_noise(mut self, snr: f64) -> Self {
        self.signal_to_noise = Some(snr);
        self
    }

    pub fn with_magnitude(mut self, magnitude1: f64) -> Self {
        self.magnitude1 = Some(magnitude1);
        self
    }

    /// Sets the secondary band. Has no effect on capabilities without a primary band.
    pub fn with_magnitude2(mut self, magnitude2: f64) -> Self {
        self.magnitude2 = Some(magnitude2);
        self
    }
}

impl SignalToNoise for SourceRecord {
    fn signal_to_noise(&self) -> f64 {
        self.signal_to_noise.unwrap_or(f64::NAN)
    }
}

impl Magnitude for SourceRecord {
    fn magnitude1(&self) -> f64 {
        self.magnitude1.unwrap_or(f64::NAN)
    }

    fn magnitude2(&self) -> Option<f64> {
        self.magnitude2
    }
}

impl SourceEntry for SourceRecord {
    fn id(&self) -> i64 {
        self.id
    }

    fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    fn as_signal_to_noise(&self) -> Option<&dyn SignalToNoise> {
        self.signal_to_noise.map(|_| self as &dyn SignalToNoise)
    }

    fn as_magnitude(&self) -> Option<&dyn Magnitude> {
        self.magnitude1.map(|_| self as &dyn Magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ra: f64, dec: f64) -> Coordinate {
        Coordinate::from_degrees(ra, dec).unwrap()
    }

    #[test]
    fn test_field_value_coercion_order() {
        assert_eq!(FieldValue::parse("42"), FieldValue::Integer(42));
        assert_eq!(FieldValue::parse(" 4.5 "), FieldValue::Real(4.5));
        assert_eq!(FieldValue::parse("1e3"), FieldValue::Real(1000.0));
        assert_eq!(FieldValue::parse("GALAXY"), FieldValue::Text("GALAXY".into()));
        assert_eq!(FieldValue::parse("   "), FieldValue::Missing);
    }

    #[test]
    fn test_field_value_numeric_views() {
        assert_eq!(FieldValue::Integer(3).as_f64(), Some(3.0));
        assert_eq!(FieldValue::Real(3.0).as_i64(), Some(3));
        assert_eq!(FieldValue::Real(3.5).as_i64(), None);
        assert_eq!(FieldValue::Text("x".into()).as_f64(), None);
        assert!(FieldValue::Missing.is_missing());
    }

    #[test]
    fn test_record_without_extras_is_position_only() {
        let r = SourceRecord::new(1, at(10.0, 0.0));
        assert!(r.as_signal_to_noise().is_none());
        assert!(r.as_magnitude().is_none());
        assert_eq!(r.capabilities().to_string(), "position-only");
    }

    #[test]
    fn test_record_capabilities_follow_values() {
        let r = SourceRecord::new(7, at(10.0, 0.0))
            .with_signal_to_noise(12.0)
            .with_magnitude(15.0)
            .with_magnitude2(14.2);
        assert_eq!(r.as_signal_to_noise().unwrap().signal_to_noise(), 12.0);
        let mag = r.as_magnitude().unwrap();
        assert_eq!(mag.magnitude1(), 15.0);
        assert_eq!(mag.magnitude2(), Some(14.2));
        assert_eq!(
            r.capabilities(),
            Capabilities {
                signal_to_noise: true,
                magnitude: true
            }
        );
    }

    #[test]
    fn test_magnitude2_alone_does_not_grant_capability() {
        let r = SourceRecord::new(1, at(0.0, 0.0)).with_magnitude2(14.0);
        assert!(r.as_magnitude().is_none());
    }

    #[test]
    fn test_entry_accessors_delegate_to_coordinate() {
        let r = SourceRecord::new(3, at(10.0, -5.0))
            .with_fields(vec![FieldValue::Integer(3), FieldValue::Real(10.0)]);
        assert!((r.ra().degrees() - 10.0).abs() < 1e-12);
        assert!((r.dec().degrees() + 5.0).abs() < 1e-12);
        assert_eq!(r.field(1), Some(&FieldValue::Real(10.0)));
        assert_eq!(r.field(2), None);
        assert_eq!(r.field_count(), 2);
    }
}
