//! Core angle type.
//!
//! [`Angle`] stores radians as `f64` and converts to and from degrees, hours,
//! arcminutes and arcseconds. Catalog positions arrive in degrees, match radii
//! are quoted in arcseconds, and the trigonometry wants radians; keeping one
//! canonical unit means every conversion happens exactly once at the edge.
//!
//! # Quick Start
//!
//! ```
//! use celestial_core::Angle;
//!
//! let ra = Angle::from_degrees(10.0);
//! let radius = Angle::from_arcseconds(1.0);
//!
//! assert!((radius.degrees() - 1.0 / 3600.0).abs() < 1e-15);
//! assert!(radius < ra);
//! ```
//!
//! # Ordering
//!
//! `Angle` derives `PartialOrd` because a NaN angle has no place in an order.
//! [`Angle::total_cmp`] gives the IEEE 754 total order for sorting and for
//! keyed lookups where a total order is required.

use core::cmp::Ordering;

use crate::constants::{ARCSEC_PER_DEGREE, HALF_PI, PI};

/// An angular measurement stored as radians.
///
/// `Copy` and 8 bytes wide; pass it by value.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Angle {
    rad: f64,
}

impl Angle {
    /// Zero angle (0 radians).
    pub const ZERO: Self = Self { rad: 0.0 };

    /// Pi radians (180 degrees).
    pub const PI: Self = Self { rad: PI };

    /// Pi/2 radians (90 degrees), the declination of the poles.
    pub const HALF_PI: Self = Self { rad: HALF_PI };

    /// Creates an angle from radians.
    ///
    /// This is the only `const` constructor because radians are the internal representation.
    #[inline]
    pub const fn from_radians(rad: f64) -> Self {
        Self { rad }
    }

    /// Creates an angle from degrees.
    ///
    /// ```
    /// use celestial_core::Angle;
    ///
    /// let angle = Angle::from_degrees(180.0);
    /// assert!((angle.radians() - std::f64::consts::PI).abs() < 1e-10);
    /// ```
    #[inline]
    pub fn from_degrees(deg: f64) -> Self {
        Self {
            rad: deg.to_radians(),
        }
    }

    /// Creates an angle from hours (24h = 360 degrees).
    #[inline]
    pub fn from_hours(h: f64) -> Self {
        Self {
            rad: (h * 15.0).to_radians(),
        }
    }

    /// Creates an angle from arcseconds.
    ///
    /// Match radii and positional uncertainties are usually quoted in
    /// arcseconds; one arcsecond is 1/3600 of a degree.
    ///
    /// ```
    /// use celestial_core::Angle;
    ///
    /// let radius = Angle::from_arcseconds(3600.0);
    /// assert!((radius.degrees() - 1.0).abs() < 1e-10);
    /// ```
    #[inline]
    pub fn from_arcseconds(arcsec: f64) -> Self {
        Self {
            rad: (arcsec / ARCSEC_PER_DEGREE).to_radians(),
        }
    }

    /// Creates an angle from arcminutes.
    #[inline]
    pub fn from_arcminutes(arcmin: f64) -> Self {
        Self {
            rad: (arcmin / 60.0).to_radians(),
        }
    }

    /// Returns the angle in radians.
    #[inline]
    pub fn radians(self) -> f64 {
        self.rad
    }

    /// Returns the angle in degrees.
    #[inline]
    pub fn degrees(self) -> f64 {
        self.rad.to_degrees()
    }

    /// Returns the angle in hours.
    #[inline]
    pub fn hours(self) -> f64 {
        self.degrees() / 15.0
    }

    /// Returns the angle in arcseconds.
    #[inline]
    pub fn arcseconds(self) -> f64 {
        self.degrees() * ARCSEC_PER_DEGREE
    }

    /// Returns the angle in arcminutes.
    #[inline]
    pub fn arcminutes(self) -> f64 {
        self.degrees() * 60.0
    }

    #[inline]
    pub fn sin(self) -> f64 {
        libm::sin(self.rad)
    }

    #[inline]
    pub fn cos(self) -> f64 {
        libm::cos(self.rad)
    }

    /// Returns `(sin, cos)` of the angle.
    #[inline]
    pub fn sin_cos(self) -> (f64, f64) {
        libm::sincos(self.rad)
    }

    /// Returns the absolute value of the angle.
    #[inline]
    pub fn abs(self) -> Self {
        Self {
            rad: self.rad.abs(),
        }
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.rad.is_finite()
    }

    /// Returns the smaller of two angles, preferring `self` on ties.
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if other.rad < self.rad {
            other
        } else {
            self
        }
    }

    /// Returns the larger of two angles, preferring `self` on ties.
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if other.rad > self.rad {
            other
        } else {
            self
        }
    }

    /// IEEE 754 total ordering of the underlying radians.
    ///
    /// ```
    /// use celestial_core::Angle;
    ///
    /// let mut radii = vec![Angle::from_arcseconds(2.0), Angle::from_arcseconds(0.5)];
    /// radii.sort_by(|a, b| a.total_cmp(b));
    /// assert_eq!(radii[0], Angle::from_arcseconds(0.5));
    /// ```
    #[inline]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.rad.total_cmp(&other.rad)
    }

    /// Wraps the angle to [-pi, +pi).
    #[inline]
    pub fn wrapped(self) -> Self {
        Self {
            rad: super::normalize::wrap_pm_pi(self.rad),
        }
    }

    /// Normalizes the angle to [0, 2*pi).
    #[inline]
    pub fn normalized(self) -> Self {
        Self {
            rad: super::normalize::wrap_0_2pi(self.rad),
        }
    }

    /// Validates the angle as a declination in [-90°, +90°].
    ///
    /// # Errors
    ///
    /// Returns [`AstroError`](crate::AstroError) if the angle is not finite or out of range.
    #[inline]
    pub fn validate_declination(self) -> Result<Self, crate::AstroError> {
        super::validate::validate_declination(self)
    }

    /// Validates the angle as a right ascension, normalizing to [0, 360) degrees.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError`](crate::AstroError) if the angle is not finite.
    #[inline]
    pub fn validate_right_ascension(self) -> Result<Self, crate::AstroError> {
        super::validate::validate_right_ascension(self)
    }

    /// Validates the angle as a search radius: finite and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`AstroError::InvalidArgument`](crate::AstroError::InvalidArgument)
    /// otherwise.
    #[inline]
    pub fn validate_search_radius(self) -> Result<Self, crate::AstroError> {
        super::validate::validate_search_radius(self)
    }
}

/// Creates an angle from degrees. Shorthand for [`Angle::from_degrees`].
#[inline]
pub fn deg(v: f64) -> Angle {
    Angle::from_degrees(v)
}

/// Creates an angle from arcseconds. Shorthand for [`Angle::from_arcseconds`].
#[inline]
pub fn arcsec(v: f64) -> Angle {
    Angle::from_arcseconds(v)
}
