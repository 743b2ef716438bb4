//! Page text normalization.

use tracing::trace;

/// Phrases removed from every statement before extraction.
pub const BOILERPLATE: &[&str] = &[
    "АО «Kaspi Bank», БИК CASPKZKA, www.kaspi.kz",
    "«Kaspi Bank» АҚ, БСК CASPKZKA, www.kaspi.kz",
    "Сумма заблокирована. Банк ожидает подтверждения от платежной системы.",
    "Сома бұғатталды. Банк төлем жүйесінің растауын күтуде.",
];

/// Joins page fragments into one single-spaced string without boilerplate.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    boilerplate: Vec<String>,
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self {
            boilerplate: BOILERPLATE.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Register additional phrases to strip.
    pub fn with_boilerplate<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.boilerplate.extend(
            phrases
                .into_iter()
                .map(|p| collapse_whitespace(p.as_ref()))
                .filter(|p| !p.is_empty()),
        );
        self
    }

    pub fn boilerplate(&self) -> &[String] {
        &self.boilerplate
    }

    /// Normalize page fragments given in page order.
    pub fn normalize_pages<S: AsRef<str>>(&self, pages: &[S]) -> String {
        let joined = pages
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        self.normalize(&joined)
    }

    /// Normalize a single fragment.
    pub fn normalize(&self, text: &str) -> String {
        let mut text = collapse_whitespace(text);
        for phrase in &self.boilerplate {
            if text.contains(phrase.as_str()) {
                trace!("Removing boilerplate {:?}", phrase);
                text = text.replace(phrase.as_str(), " ");
            }
        }
        collapse_whitespace(&text)
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Collapse every whitespace run (newlines and NBSP included) to one space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
