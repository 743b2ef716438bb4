//! Transaction table extraction.
//!
//! A line is `dd.mm.yy`, a signed amount, an operation token and free-text
//! details. Details have no terminator; they run until the next date token or
//! the end of the text.

use regex::Captures;

use super::patterns::{DATE_TOKEN, TRANSACTION_HEAD};
use super::values::{parse_amount, parse_date, AmountKind};
use crate::error::ExtractionError;
use crate::models::statement::TransactionRecord;

/// One transaction line as found in the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTransaction<'t> {
    pub date: &'t str,
    pub amount: &'t str,
    pub transaction_type: &'t str,
    pub detail: &'t str,
}

/// Extracts transaction lines in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionExtractor;

impl TransactionExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Locate all transaction lines without converting them.
    pub fn extract_raw<'t>(&self, text: &'t str) -> Vec<RawTransaction<'t>> {
        let mut lines = Vec::new();
        let mut pos = 0;

        while let Some(caps) = TRANSACTION_HEAD.captures_at(text, pos) {
            let Some(head) = caps.get(0) else { break };
            let detail_end = DATE_TOKEN
                .find_at(text, head.end())
                .map_or(text.len(), |m| m.start());

            lines.push(RawTransaction {
                date: group(&caps, 1),
                amount: group(&caps, 2),
                transaction_type: group(&caps, 3),
                detail: text[head.end()..detail_end].trim(),
            });

            pos = detail_end.max(head.end());
        }

        lines
    }

    /// Locate and convert all transaction lines.
    ///
    /// No lines is a valid, empty result.
    pub fn extract(&self, text: &str) -> Result<Vec<TransactionRecord>, ExtractionError> {
        self.extract_raw(text)
            .into_iter()
            .map(|raw| {
                Ok(TransactionRecord {
                    operation_date: parse_date(raw.date, "operationDate")?,
                    amount: parse_amount(raw.amount, AmountKind::Transaction)?,
                    transaction_type: raw.transaction_type.to_string(),
                    detail: raw.detail.to_string(),
                })
            })
            .collect()
    }
}

fn group<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}
