//! Equatorial sky position.
//!
//! [`Coordinate`] pairs a right ascension with a declination and measures
//! great-circle separations between positions. Construction validates both
//! angles: RA must be finite and is wrapped into [0°, 360°), Dec must lie in
//! [-90°, +90°].

use crate::math::vincenty_angular_separation;
use crate::{Angle, AstroResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A validated (RA, Dec) position on the celestial sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coordinate {
    ra: Angle,
    dec: Angle,
}

impl Coordinate {
    pub fn new(ra: Angle, dec: Angle) -> AstroResult<Self> {
        let ra = ra.validate_right_ascension()?;
        let dec = dec.validate_declination()?;
        Ok(Self { ra, dec })
    }

    pub fn from_degrees(ra_deg: f64, dec_deg: f64) -> AstroResult<Self> {
        Self::new(Angle::from_degrees(ra_deg), Angle::from_degrees(dec_deg))
    }

    pub fn ra(&self) -> Angle {
        self.ra
    }

    pub fn dec(&self) -> Angle {
        self.dec
    }

    /// Great-circle angular distance to `other`.
    ///
    /// ```
    /// use celestial_core::{Angle, Coordinate};
    ///
    /// let a = Coordinate::from_degrees(10.0, 0.0).unwrap();
    /// let b = Coordinate::from_degrees(10.0, 1.0).unwrap();
    /// assert!((a.distance_to(&b).degrees() - 1.0).abs() < 1e-12);
    /// ```
    pub fn distance_to(&self, other: &Self) -> Angle {
        let (sin_dec1, cos_dec1) = self.dec.sin_cos();
        let (sin_dec2, cos_dec2) = other.dec.sin_cos();
        let delta_ra = (other.ra - self.ra).radians();

        Angle::from_radians(vincenty_angular_separation(
            sin_dec1, cos_dec1, sin_dec2, cos_dec2, delta_ra,
        ))
    }

    /// Within one degree of either celestial pole.
    ///
    /// Linear RA/Dec grids lose their distance guarantee here because a
    /// degree of RA shrinks by `cos(Dec)`.
    pub fn is_near_pole(&self) -> bool {
        self.dec.abs().degrees() > 89.0
    }
}
