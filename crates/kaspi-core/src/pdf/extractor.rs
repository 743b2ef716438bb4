//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor using lopdf.
pub struct PdfExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
    max_pages: usize,
}

/// Extracted content from a PDF.
#[derive(Debug, Clone)]
pub struct PdfContent {
    /// Pages with their text.
    pub pages: Vec<PdfPage>,
}

/// Content from a single PDF page.
#[derive(Debug, Clone)]
pub struct PdfPage {
    /// Page number (1-indexed).
    pub number: u32,
    /// Extracted text from this page.
    pub text: String,
}

impl PdfContent {
    /// Page texts in page order.
    pub fn texts(&self) -> Vec<String> {
        self.pages.iter().map(|p| p.text.clone()).collect()
    }

    /// Whether the document carries a usable text layer.
    pub fn has_text_layer(&self, min_text_length: usize) -> bool {
        let total: usize = self.pages.iter().map(|p| p.text.trim().chars().count()).sum();
        total >= min_text_length
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
            max_pages: 0,
        }
    }

    /// Limit the number of pages read (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Extract the text of every page.
    pub fn extract_all(&self) -> Result<PdfContent> {
        let texts = self.extract_page_texts()?;
        let pages: Vec<PdfPage> = texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| PdfPage {
                number: i as u32 + 1,
                text,
            })
            .collect();

        debug!(
            "PDF text: {} pages, {} chars",
            pages.len(),
            pages.iter().map(|p| p.text.len()).sum::<usize>()
        );

        Ok(PdfContent { pages })
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| PdfError::Parse("No document loaded".to_string()))
    }

    fn pages_to_read(&self, page_count: u32) -> u32 {
        match self.max_pages {
            0 => page_count,
            max => page_count.min(max as u32),
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf_extract reads the decrypted copy
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_text(&self) -> Result<String> {
        self.document()?;
        pdf_extract::extract_text_from_mem(&self.raw_data)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }

    fn extract_page_texts(&self) -> Result<Vec<String>> {
        let doc = self.document()?;
        let pages = self.pages_to_read(self.page_count());

        let mut texts = Vec::with_capacity(pages as usize);
        for page in 1..=pages {
            let text = doc.extract_text(&[page]).unwrap_or_else(|e| {
                trace!("lopdf could not read page {}: {}", page, e);
                String::new()
            });
            texts.push(text);
        }

        // Fall back to whole-document extraction when the per-page layer is empty
        if texts.iter().all(|t| t.trim().is_empty()) {
            debug!("No per-page text, falling back to pdf-extract");
            return Ok(vec![self.extract_text()?]);
        }

        Ok(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_extract_without_document() {
        let extractor = PdfExtractor::new();
        assert!(matches!(extractor.extract_page_texts(), Err(PdfError::Parse(_))));
        assert!(matches!(extractor.extract_text(), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_max_pages() {
        assert_eq!(PdfExtractor::new().pages_to_read(5), 5);
        assert_eq!(PdfExtractor::new().with_max_pages(2).pages_to_read(5), 2);
        assert_eq!(PdfExtractor::new().with_max_pages(9).pages_to_read(5), 5);
    }

    #[test]
    fn test_has_text_layer() {
        let content = PdfContent {
            pages: vec![
                PdfPage {
                    number: 1,
                    text: "  ВЫПИСКА  ".to_string(),
                },
                PdfPage {
                    number: 2,
                    text: "\n".to_string(),
                },
            ],
        };
        assert!(content.has_text_layer(7));
        assert!(!content.has_text_layer(8));
        assert_eq!(content.texts().len(), 2);
    }
}
