//! Error types for paragraph and page sources.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to read one of the inputs of a structure extraction run.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid DOCX archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot extract PDF text: {0}")]
    Pdf(String),

    #[error("Missing part '{part}' in {}", .path.display())]
    MissingPart { path: PathBuf, part: &'static str },

    #[error("Unsupported input format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}
