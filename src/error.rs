//! Error types for the twbfields library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for twbfields operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or extracting a workbook.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not exist.
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Wrong extension, or a container that is not a ZIP archive.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The container is a valid archive but holds no workbook document.
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    /// The workbook XML could not be parsed.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error while serializing field records.
    #[error("Render error: {0}")]
    Render(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::MalformedInput(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::MalformedInput(err.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Error::Render(err.to_string())
    }
}
