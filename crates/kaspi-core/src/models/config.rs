//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::KaspiError;

/// Main configuration for the kaspi pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KaspiConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Statement extraction configuration.
    pub extraction: ExtractionConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Minimum text length to consider the PDF as having a text layer.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            min_text_length: 50,
        }
    }
}

/// Statement extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Drop IBANs that fail the mod-97 checksum instead of keeping them as printed.
    pub validate_iban: bool,

    /// Additional phrases stripped during normalization.
    pub extra_boilerplate: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            validate_iban: false,
            extra_boilerplate: Vec::new(),
        }
    }
}

impl KaspiConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, KaspiError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| KaspiError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), KaspiError> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| KaspiError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
