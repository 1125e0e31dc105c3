//! Error types for configuration and entity construction
//!
//! The per-tick update path never fails; everything here is raised either
//! while loading settings or while building the session.

use thiserror::Error;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Settings file could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON or is missing keys
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    /// A setting parsed but is outside its valid range
    #[error("invalid setting {key}: {reason}")]
    InvalidSetting { key: &'static str, reason: String },

    /// Circle entities need a finite, positive radius
    #[error("radius must be finite and positive, got {0}")]
    InvalidRadius(f32),

    /// Rectangles need a finite, positive size
    #[error("rect size must be finite and positive, got {width}x{height}")]
    InvalidRect { width: f32, height: f32 },
}
