//! Errors which can occur while reading mask files and reconstructing
//! kinematics

use crate::{mass::Isotope, numeric::Float};
use std::path::PathBuf;

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MaskError>;

/// Everything that can go wrong in this crate
#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    /// A file could not be opened or created
    #[error("Failed to open {path:?}: {source}")]
    File {
        /// Path which was being opened
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The byte stream does not follow the mask file layout
    #[error("Invalid mask file: {0}")]
    Format(String),

    /// A reader operation was invoked in the wrong state
    #[error("Invalid reader state: {0}")]
    State(String),

    /// A Lorentz boost was requested at or above the speed of light
    #[error("Invalid boost: beta^2 = {beta2} is not below 1")]
    InvalidBoost {
        /// Squared norm of the requested velocity
        beta2: Float,
    },

    /// The mass table could not be loaded
    #[error("Failed to load mass table: {0}")]
    MassFile(String),

    /// The mass table has no entry for this isotope
    #[error("No mass table entry for {0}")]
    UnknownIsotope(Isotope),

    /// Any other I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
