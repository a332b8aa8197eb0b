//! Error types for pair-eval operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pair-eval operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while matching, scoring, or reporting image pairs.
///
/// Every variant is fatal to a run; nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An input directory is missing or cannot be listed.
    #[error("Directory access failed: {path}: {reason}")]
    DirectoryAccess {
        /// Directory that could not be read.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Failed to decode an image file.
    #[error("Image decode failed: {path}: {reason}")]
    ImageDecode {
        /// Path to the image that failed to decode.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Failed to encode or save an image file.
    #[error("Image encode failed: {path}: {reason}")]
    ImageEncode {
        /// Path of the image that could not be written.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// The two images of a pair have different dimensions.
    #[error("Dimension mismatch for {file}: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        /// Shared filename of the pair.
        file: String,
        /// Reference dimensions (width, height).
        expected: (usize, usize),
        /// Comparison dimensions (width, height).
        actual: (usize, usize),
    },

    /// The metric function failed.
    #[error("Metric calculation failed: {metric}: {reason}")]
    MetricCalculation {
        /// Name of the metric that failed.
        metric: String,
        /// Reason for the failure.
        reason: String,
    },

    /// The metric produced NaN or an infinity.
    #[error("Non-finite score for {file}: {value}")]
    NonFiniteScore {
        /// Shared filename of the pair.
        file: String,
        /// The offending value.
        value: f64,
    },

    /// No pairs were recorded, so there is nothing to aggregate.
    #[error("No matching image pairs were found; nothing to aggregate")]
    EmptyResultSet,

    /// A report operation was invoked out of sequence.
    #[error("Lifecycle error: {0}")]
    Lifecycle(String),

    /// The metric cannot run on the requested device.
    #[error("Metric {metric} does not support device {device}")]
    UnsupportedDevice {
        /// Name of the metric.
        metric: String,
        /// Requested device.
        device: String,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// I/O error wrapper.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn directory_access(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::DirectoryAccess {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn image_decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ImageDecode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
