//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur while sampling frames or running pose inference.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Failed to open video file: {}", .0.display())]
    OpenFailed(PathBuf),

    #[error("Video duration ({duration:.2}s) exceeds maximum ({max:.0}s)")]
    DurationExceeded { duration: f64, max: f64 },

    #[error("Frame read failed: {0}")]
    ReadFailed(String),

    #[error("Pose detection failed: {0}")]
    DetectionFailed(String),

    #[error("Pose model not found: {0}")]
    ModelNotFound(String),

    #[error("OpenCV error: {0}")]
    OpenCv(#[from] opencv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    /// Create a detection failure error.
    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::DetectionFailed(message.into())
    }

    /// Create a model not found error.
    pub fn model_not_found(message: impl Into<String>) -> Self {
        Self::ModelNotFound(message.into())
    }
}
