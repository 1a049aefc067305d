//! Per-format text extraction.
//!
//! Every extractor maps a file path to text. Failures never cross the
//! extractor boundary as errors: [`ExtractorRegistry::extract`] reports them
//! to the observer and substitutes an inline message for the content.

pub mod office;
pub mod pdf;
pub mod registry;
pub mod text;

pub use registry::{ExtractorKind, ExtractorRegistry, FileType};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("malformed XML: {0}")]
    Xml(String),

    #[error("{0}")]
    Pdf(String),

    #[error("parser panicked: {0}")]
    Panicked(String),

    #[error("missing document part: {0}")]
    MissingPart(String),
}
