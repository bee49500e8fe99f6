use std::path::PathBuf;

use thiserror::Error;

/// Failures that abort a pipeline run.
///
/// Malformed numeric cells are not represented here: they are coerced to
/// missing values during preprocessing and only logged.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input resource is missing, unreadable, or lacks the expected sheet.
    #[error("cannot load {}: {reason}", .path.display())]
    Resource { path: PathBuf, reason: String },

    #[error("required column '{0}' not found in header")]
    MissingColumn(String),

    /// Too few usable rows for the next stage.
    #[error("not enough data: {0}")]
    DataSufficiency(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("least-squares solve failed: {0}")]
    Numerical(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    pub(crate) fn resource(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        PipelineError::Resource {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
