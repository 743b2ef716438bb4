//! Error types for the kaspi-core library.

use thiserror::Error;

/// Main error type for the kaspi library.
#[derive(Error, Debug)]
pub enum KaspiError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to statement extraction.
///
/// Any of these aborts the whole statement; no partial record is produced.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Required field is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A located value could not be converted.
    #[error("failed to convert {field}: {value:?}")]
    Conversion { field: String, value: String },

    /// Field validation failed.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Input could not be decoded to text.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// A date-parameterized pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl ExtractionError {
    pub(crate) fn conversion(field: &str, value: &str) -> Self {
        Self::Conversion {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Result type for the kaspi library.
pub type Result<T> = std::result::Result<T, KaspiError>;
