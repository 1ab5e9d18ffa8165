//! Grid-indexed cross-matching of point-source catalogs.
//!
//! Pairs each entry of a primary catalog with the nearest compatible entry of
//! a secondary catalog inside an angular radius, one-to-one and greedily in
//! primary order, then sweeps the match over signal-to-noise cutoffs and
//! radii from 0.1″ to 10.0″.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`source`] | [`SourceEntry`] trait, capability traits, [`SourceRecord`], [`FieldValue`] |
//! | [`catalog`] | [`SourceList`] and its shared [`FieldDictionary`] |
//! | [`reader`] | [`CatalogReader`] for delimited text with a [`ColumnMap`] |
//! | [`index`] | [`CoordinateIndex`] grid over RA/Dec, [`PixelCell`] |
//! | [`engine`] | [`MatchEngine`], [`MatchConfig`], [`CandidateSelection`], [`cross_match`] |
//! | [`result`] | [`MatchResult`] partitions, [`SkyBounds`], [`MatchSummary`] |
//! | [`sweep`] | [`ParameterSweep`] and the resulting [`SweepTable`] |
//! | [`observer`] | [`MatchObserver`] progress hooks, [`LogObserver`] |
//!
//! # Quick Start
//!
//! ```
//! use celestial_core::{Angle, Coordinate};
//! use celestial_crossmatch::{cross_match, SourceEntry, SourceRecord};
//!
//! let primary = vec![
//!     SourceRecord::new(1, Coordinate::from_degrees(10.0, 0.0)?).with_magnitude(15.0),
//!     SourceRecord::new(2, Coordinate::from_degrees(10.005, 0.0)?).with_magnitude(16.0),
//! ];
//! let secondary = vec![
//!     SourceRecord::new(101, Coordinate::from_degrees(10.00003, 0.0)?).with_magnitude(15.2),
//!     SourceRecord::new(102, Coordinate::from_degrees(10.00492, 0.0)?).with_magnitude(20.0),
//! ];
//!
//! let result = cross_match(&primary, &secondary, Angle::from_arcseconds(1.0))?;
//! assert_eq!(result.match_count(), 1);
//! assert_eq!(result.primary_unmatched()[0].id(), 2);
//! # Ok::<(), celestial_crossmatch::Error>(())
//! ```
//!
//! # Limitations
//!
//! The grid is linear in RA and Dec. Near the poles, and across the 0°/360°
//! RA seam, true neighbours can fall outside the searched cells. See
//! [`index`].
//!
//! # Features
//!
//! - **`serde`**: `Serialize` for [`MatchSummary`] and the geometry types.
//! - **`cli`**: the `crossmatch` binary (requires `serde` as well).

pub mod catalog;
pub mod engine;
pub mod error;
pub mod index;
pub mod observer;
pub mod reader;
pub mod result;
pub mod source;
pub mod sweep;

pub use catalog::{FieldDictionary, SourceList};
pub use engine::{cross_match, CandidateSelection, MatchConfig, MatchEngine};
pub use error::{Error, Result};
pub use index::{CoordinateIndex, PixelCell};
pub use observer::{LogObserver, MatchObserver, NullObserver};
pub use reader::{CatalogReader, ColumnMap};
pub use result::{MatchResult, MatchSummary, SkyBounds};
pub use source::{Capabilities, FieldValue, Magnitude, SignalToNoise, SourceEntry, SourceRecord};
pub use sweep::{sweep_radii, ParameterSweep, SweepRow, SweepTable};
