//! Error types shared by every module.
//!
//! All failures are deterministic input or programming errors, so nothing
//! is retried: the first problem found is returned to the caller.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LandscapeError>;

/// Unified error type for landscape generation, evaluation and persistence.
#[derive(Debug, Error)]
pub enum LandscapeError {
    /// Malformed, missing or duplicated field in a problem file, or a seed
    /// table that disagrees with the declared header.
    #[error("invalid file format{}: {message}", line_suffix(.line))]
    Format {
        /// 1-based line number, when the error is tied to a line.
        line: Option<usize>,
        /// What went wrong.
        message: String,
    },

    /// Malformed domain/codomain tokens, or a domain kind the requested
    /// operation does not support.
    #[error("domain error: {0}")]
    Domain(String),

    /// Two points handed to a metric have different lengths.
    #[error("points differ in length: {left} != {right}")]
    DimensionMismatch {
        /// Length of the first point.
        left: usize,
        /// Length of the second point.
        right: usize,
    },

    /// Coordinates of the wrong kind for the operation.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// A selector was given nothing to choose from.
    #[error("no candidates: {0}")]
    EmptyCandidates(&'static str),

    /// Interpolation needs more seeds than were supplied.
    #[error("interpolation needs at least {required} seeds, got {available}")]
    InsufficientSeeds {
        /// Minimum number of seeds.
        required: usize,
        /// Number of seeds supplied.
        available: usize,
    },

    /// A constructor or configuration parameter is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Generator configuration could not be read.
    #[error("configuration error: {0}")]
    Config(String),

    /// File I/O failure while saving or loading.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn line_suffix(line: &Option<usize>) -> String {
    match line {
        Some(l) => format!(" (line {l})"),
        None => String::new(),
    }
}

impl LandscapeError {
    /// Format error attached to a source line.
    pub fn format_at(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line: Some(line),
            message: message.into(),
        }
    }

    /// Format error not tied to any particular line.
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format {
            line: None,
            message: message.into(),
        }
    }

    /// Whether this is a [`LandscapeError::Format`].
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}
