//! Geometry primitives for catalog cross-matching.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`angle`] | [`Angle`], normalization, validation of RA/Dec and search radii |
//! | [`coordinate`] | [`Coordinate`] and great-circle separation |
//! | [`errors`] | [`AstroError`], [`MathErrorKind`], [`AstroResult`] |
//! | [`math`] | Vincenty separation kernel |
//! | [`constants`] | Unit conversion constants |
//!
//! # Features
//!
//! - **`serde`**: `Serialize`/`Deserialize` for [`Angle`] (as radians) and [`Coordinate`].

pub mod angle;
pub mod constants;
pub mod coordinate;
pub mod errors;
pub mod math;

pub use angle::Angle;
pub use coordinate::Coordinate;
pub use errors::{AstroError, AstroResult, MathErrorKind};
