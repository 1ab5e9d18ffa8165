use super::core::Angle;
use crate::constants::HALF_PI;
use crate::{AstroError, MathErrorKind};

pub fn validate_right_ascension(angle: Angle) -> Result<Angle, AstroError> {
    let rad = angle.radians();
    if rad.is_finite() {
        let normalized = super::normalize::wrap_0_2pi(rad);
        return Ok(Angle::from_radians(normalized));
    }

    Err(AstroError::math_error(
        "validate_right_ascension",
        MathErrorKind::NotFinite,
        "RA Not Finite",
    ))
}

/// Validates declination angle in the standard range [-90°, +90°].
pub fn validate_declination(angle: Angle) -> Result<Angle, AstroError> {
    let rad = angle.radians();
    if !rad.is_finite() {
        return Err(AstroError::math_error(
            "validate_declination",
            MathErrorKind::NotFinite,
            "Dec not Finite",
        ));
    }

    if (-HALF_PI..=HALF_PI).contains(&rad) {
        return Ok(angle);
    }

    Err(AstroError::math_error(
        "validate_declination",
        MathErrorKind::OutOfRange,
        &format!("Dec {:.2}° out of range [-90°, +90°]", angle.degrees()),
    ))
}

/// Validates a matching radius: it must be finite and strictly positive.
///
/// The grid index divides by twice the radius, so zero is rejected along
/// with negative and non-finite values.
pub fn validate_search_radius(angle: Angle) -> Result<Angle, AstroError> {
    let rad = angle.radians();
    if !rad.is_finite() {
        return Err(AstroError::invalid_argument(
            "radius",
            &format!("search radius must be finite, got {}", rad),
        ));
    }
    if rad <= 0.0 {
        return Err(AstroError::invalid_argument(
            "radius",
            &format!(
                "search radius must be positive, got {:.6}\"",
                angle.arcseconds()
            ),
        ));
    }
    Ok(angle)
}
