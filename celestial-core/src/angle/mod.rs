mod core;
mod normalize;
mod ops;
#[cfg(feature = "serde")]
mod serde_;
mod validate;

pub use core::Angle;
pub use normalize::{clamp_dec, wrap_0_2pi, wrap_pm_pi};
pub use validate::{validate_declination, validate_right_ascension, validate_search_radius};

pub use core::{arcsec, deg};
