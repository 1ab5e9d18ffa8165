//! Angle normalization.
//!
//! | Quantity | Range | Function |
//! |----------|-------|----------|
//! | Right Ascension | [0, 2pi) | [`wrap_0_2pi`] |
//! | RA differences | [-pi, +pi) | [`wrap_pm_pi`] |
//! | Declination | [-pi/2, +pi/2] | [`clamp_dec`] |
//!
//! The wrapping functions use `libm::fmod` (via [`crate::math::fmod`]) and then
//! shift into range; `fmod` keeps the sign of the dividend, like `%`.
//!
//! ```
//! use celestial_core::angle::{wrap_0_2pi, wrap_pm_pi, clamp_dec};
//! use std::f64::consts::PI;
//!
//! let ra = wrap_0_2pi(-0.5);
//! assert!(ra > 0.0 && ra < 2.0 * PI);
//!
//! let d_ra = wrap_pm_pi(3.5);
//! assert!(d_ra >= -PI && d_ra < PI);
//!
//! let dec = clamp_dec(2.0);
//! assert!((dec - PI / 2.0).abs() < 1e-10);
//! ```

use crate::constants::{HALF_PI, PI, TWOPI};
use crate::math::fmod;

/// Wraps an angle to [-pi, +pi) radians.
#[inline]
pub fn wrap_pm_pi(x: f64) -> f64 {
    let w = fmod(x, TWOPI);
    if w.abs() >= PI {
        return w - TWOPI.copysign(x);
    }

    w
}

/// Wraps an angle to [0, 2pi) radians.
///
/// Right ascension lives here: catalogs sometimes carry -0.001° or 360.0°,
/// both of which must land on the same grid as their neighbours.
#[inline]
pub fn wrap_0_2pi(x: f64) -> f64 {
    let w = fmod(x, TWOPI);
    if w < 0.0 {
        w + TWOPI
    } else {
        w
    }
}

/// Clamps an angle to [-pi/2, +pi/2] radians.
#[inline]
pub fn clamp_dec(x: f64) -> f64 {
    x.clamp(-HALF_PI, HALF_PI)
}
