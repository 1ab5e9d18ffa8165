//! Arithmetic operators for [`Angle`].
//!
//! `+`, `-`, unary `-`, scalar `*` and `/`, plus `Angle / Angle` as a plain
//! ratio (used when converting an offset into a count of grid cells).

use super::core::Angle;
use core::iter::Sum;
use core::ops::*;

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Angle::from_radians(self.radians() + rhs.radians())
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Angle::from_radians(self.radians() - rhs.radians())
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;
    #[inline]
    fn mul(self, k: f64) -> Self {
        Angle::from_radians(self.radians() * k)
    }
}

impl Div<f64> for Angle {
    type Output = Angle;
    #[inline]
    fn div(self, k: f64) -> Self {
        Angle::from_radians(self.radians() / k)
    }
}

/// Angle / Angle → dimensionless ratio
impl Div for Angle {
    type Output = f64;
    #[inline]
    fn div(self, rhs: Self) -> f64 {
        self.radians() / rhs.radians()
    }
}

impl Neg for Angle {
    type Output = Angle;
    #[inline]
    fn neg(self) -> Self {
        Angle::from_radians(-self.radians())
    }
}

impl Sum for Angle {
    fn sum<I: Iterator<Item = Angle>>(iter: I) -> Self {
        iter.fold(Angle::ZERO, Add::add)
    }
}
