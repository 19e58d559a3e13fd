//! Basic numerical concepts used throughout the crate

#![allow(missing_docs)]

// Mask files store double precision values, so that is what we compute with
pub type Float = f64;
pub use std::f64 as reals;

/// Mathematical functions
pub mod functions {
    use super::{reals::consts::PI, Float};

    /// Convert an angle from radians to degrees
    pub fn to_degrees(rad: Float) -> Float {
        rad * 180. / PI
    }

    /// Convert an angle from degrees to radians
    pub fn to_radians(deg: Float) -> Float {
        deg * PI / 180.
    }
}
