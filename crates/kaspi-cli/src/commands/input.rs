//! Reading statement inputs into per-page text.

use std::fs;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use tracing::{debug, warn};

use kaspi_core::models::config::KaspiConfig;
use kaspi_core::pdf::{PdfExtractor, PdfProcessor};

/// Page separator in pre-extracted text files.
pub const PAGE_BREAK: char = '\x0c';

/// Extensions accepted by `process` and `batch`.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt"];

/// Read an input file into page texts.
///
/// With `base64` set the file holds a base64-encoded PDF.
pub fn load_pages(path: &Path, base64: bool, config: &KaspiConfig) -> anyhow::Result<Vec<String>> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    if base64 {
        let encoded = fs::read_to_string(path)?;
        let data = decode_payload(&encoded)?;
        return pdf_pages(&data, config);
    }

    let extension = extension(path);
    match extension.as_str() {
        "pdf" => pdf_pages(&fs::read(path)?, config),
        "txt" => {
            let bytes = fs::read(path)?;
            let text = String::from_utf8(bytes)
                .map_err(|e| anyhow::anyhow!("{} is not valid UTF-8: {}", path.display(), e))?;
            Ok(text_pages(&text))
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    }
}

/// Lowercased file extension, empty if none.
pub fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Decode a base64 PDF payload, tolerating a `data:` URL prefix and line breaks.
pub fn decode_payload(encoded: &str) -> anyhow::Result<Vec<u8>> {
    let payload = match encoded.find("base64,") {
        Some(pos) => &encoded[pos + "base64,".len()..],
        None => encoded,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| anyhow::anyhow!("Invalid base64 payload: {}", e))
}

/// Split pre-extracted text on form feeds.
pub fn text_pages(text: &str) -> Vec<String> {
    text.split(PAGE_BREAK).map(str::to_string).collect()
}

fn pdf_pages(data: &[u8], config: &KaspiConfig) -> anyhow::Result<Vec<String>> {
    let mut extractor = PdfExtractor::new().with_max_pages(config.pdf.max_pages);
    extractor.load(data)?;
    debug!("PDF has {} pages", extractor.page_count());

    let content = extractor.extract_all()?;
    if !content.has_text_layer(config.pdf.min_text_length) {
        warn!(
            "PDF text layer is shorter than {} characters; scanned statements are not supported",
            config.pdf.min_text_length
        );
    }

    Ok(content.texts())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_text_pages() {
        assert_eq!(text_pages("one\x0ctwo"), vec!["one", "two"]);
        assert_eq!(text_pages("single"), vec!["single"]);
    }

    #[test]
    fn test_decode_payload() {
        let encoded = general_purpose::STANDARD.encode(b"%PDF-1.4 body");
        assert_eq!(decode_payload(&encoded).unwrap(), b"%PDF-1.4 body");

        let wrapped = format!("data:application/pdf;base64,{}\n", encoded);
        assert_eq!(decode_payload(&wrapped).unwrap(), b"%PDF-1.4 body");

        assert!(decode_payload("not base64!").is_err());
    }

    #[test]
    fn test_extension() {
        assert_eq!(extension(Path::new("a/Statement.PDF")), "pdf");
        assert_eq!(extension(Path::new("noext")), "");
    }
}
