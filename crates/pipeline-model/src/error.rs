//! Error types for the record model.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building or validating model values.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Clock hours outside `0..=12`.
    #[error("orientation hours out of range: {hours}")]
    HoursOutOfRange { hours: i64 },

    /// Clock minutes outside `0..=59`.
    #[error("orientation minutes out of range: {minutes}")]
    MinutesOutOfRange { minutes: i64 },

    /// Orientation text that is not `H,MM` or `H`.
    #[error("invalid orientation '{text}'")]
    InvalidOrientation { text: String },

    /// Numeric cell that cannot be read as a number.
    #[error("invalid number '{text}'")]
    InvalidNumber { text: String },

    #[error("wrong seam type: {code}")]
    UnknownSeamType { code: i64 },

    #[error("wrong defect type: {code}")]
    UnknownDefectType { code: i64 },

    #[error("wrong marker type: {code}")]
    UnknownMarkerType { code: i64 },

    /// Schema profile file could not be read.
    #[error("failed to read profile {path}: {source}")]
    ProfileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Schema profile text is not valid TOML for a profile.
    #[error("invalid profile: {source}")]
    ProfileParse {
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ModelError>;
