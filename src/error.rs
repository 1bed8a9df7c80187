//! Error types for mdpdf library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for mdpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
///
/// Markdown itself never produces an error: every input classifies into
/// some block. Only I/O, verification and serialization can fail.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The Markdown input file does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The PDF output could not be written or moved into place.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        /// Target output path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },

    /// A byte stream failed structural PDF checks.
    #[error("Invalid PDF structure: {0}")]
    InvalidPdf(String),

    /// The input could not be watched for changes.
    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    /// Error serializing blocks or PDF objects.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
