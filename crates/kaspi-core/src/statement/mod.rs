//! Statement extraction module.

mod normalize;
mod parser;
pub mod rules;

pub use normalize::{collapse_whitespace, TextNormalizer, BOILERPLATE};
pub use parser::StatementParser;

use crate::error::ExtractionError;
use crate::models::statement::StatementRecord;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for statement extractors.
pub trait StatementExtractor {
    /// Extract a statement from per-page text in page order.
    fn extract_from_pages(&self, pages: &[String]) -> Result<StatementRecord>;

    /// Extract a statement from plain text.
    fn extract_from_text(&self, text: &str) -> Result<StatementRecord>;
}
