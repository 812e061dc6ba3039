//! Error taxonomy shared by the recommender crates
//!
//! Every failure raised by the core operations is a precondition violation:
//! it is detected before any computation starts and the same input always
//! fails the same way, so callers should not retry.

use std::path::PathBuf;
use thiserror::Error;

/// What an index or label refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    User,
    Item,
}

impl Axis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::User => "user",
            Axis::Item => "item",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced by rating-matrix validation, scoring, configuration and
/// dataset loading
#[derive(Debug, Error)]
pub enum RecsysError {
    /// Empty, ragged, mislabelled or non-finite matrix input
    #[error("Invalid matrix shape: {reason}")]
    InvalidShape { reason: String },

    /// Out-of-range user or item index
    #[error("Invalid {kind} index {index} (expected 0..{len})")]
    InvalidIndex { kind: Axis, index: usize, len: usize },

    /// Similarity matrix side disagrees with the rating matrix item count
    #[error("Dimension mismatch: expected {expected}x{expected} similarity matrix, got {actual_rows}x{actual_cols}")]
    DimensionMismatch {
        expected: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    /// A user or item name did not resolve to an index
    #[error("Unknown {kind}: {label}")]
    UnknownLabel { kind: Axis, label: String },

    #[error("Configuration error: {message}")]
    ConfigurationError {
        message: String,
        key: Option<String>,
    },

    #[error("Failed to load dataset {path}: {message}")]
    Dataset { path: PathBuf, message: String },

    #[error("Failed to write {path}: {message}")]
    Export { path: PathBuf, message: String },
}

impl RecsysError {
    pub fn invalid_shape(reason: impl Into<String>) -> Self {
        RecsysError::InvalidShape {
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>, key: &str) -> Self {
        RecsysError::ConfigurationError {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }

    /// Whether the error comes from the caller passing bad matrix input
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            RecsysError::InvalidShape { .. }
                | RecsysError::InvalidIndex { .. }
                | RecsysError::DimensionMismatch { .. }
        )
    }
}
