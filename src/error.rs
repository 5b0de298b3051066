//! Error types for the body gesture analysis library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Config or recording file could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Recording or event JSON could not be parsed or written
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Landmark detector failed to load or run
    #[error("Detector error: {0}")]
    DetectorError(String),

    /// Frame source could not be opened or read
    #[error("Frame source error: {0}")]
    FrameSourceError(String),

    /// Replay recording is malformed
    #[error("Replay error: {0}")]
    ReplayError(String),

    /// Filter initialization or processing error
    #[error("Filter error: {0}")]
    FilterError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
