//! Error types for the data-loader crate.
//!
//! Every variant is fatal: the program cannot recommend anything without
//! both artifacts, so callers are expected to abort on any of these.

use thiserror::Error;

/// Errors that can occur while loading or validating the artifacts
///
/// The `#[derive(Error)]` macro from thiserror implements
/// `std::error::Error` and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Artifact file does not exist
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading or writing an artifact
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Artifact bytes could not be decoded
    #[error("Parse error in {file}: {reason}")]
    ParseError { file: String, reason: String },

    /// A decoded value is not acceptable (e.g. a NaN similarity score)
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// A row of the similarity matrix has the wrong length
    #[error("Similarity matrix is not square: row {row} has {found} columns, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Movie table and similarity matrix disagree on the number of movies
    #[error("Movie table has {movies} rows but similarity matrix is {rows}x{rows}")]
    DimensionMismatch { movies: usize, rows: usize },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
