//! Error types for the pdfoutline library.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for pdfoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while inferring an outline.
///
/// Malformed individual fragments are never errors; they are skipped with a
/// logged warning. A document without headings is not an error either.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The input file exists but could not be read.
    #[error("Cannot read input file {}: {source}", path.display())]
    InputUnreadable {
        /// Path that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The PDF is malformed or encrypted and could not be decoded.
    #[error("PDF decode error: {0}")]
    Decode(String),

    /// The output file could not be written.
    #[error("Cannot write output file {}: {source}", path.display())]
    Write {
        /// Path that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error during JSON rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Decode(err.to_string())
    }
}
