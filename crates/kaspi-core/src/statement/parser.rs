//! Statement parser: normalized text in, one [`StatementRecord`] out.

use std::time::Instant;

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::statement::{StatementRecord, FINANCIAL_INSTITUTION};

use super::normalize::TextNormalizer;
use super::rules::{
    fields::{FieldExtractor, RawFields},
    iban::validate_iban,
    transactions::TransactionExtractor,
    values::{parse_date, parse_optional_amount, AmountKind},
};
use super::{Result, StatementExtractor};

/// Rule-based Kaspi statement parser.
///
/// Holds no mutable state; one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct StatementParser {
    normalizer: TextNormalizer,
    fields: FieldExtractor,
    transactions: TransactionExtractor,
    /// Drop IBANs with a bad checksum instead of keeping them as printed.
    validate_iban: bool,
}

impl StatementParser {
    /// Create a new parser with default settings.
    pub fn new() -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            fields: FieldExtractor::new(),
            transactions: TransactionExtractor::new(),
            validate_iban: false,
        }
    }

    /// Create a parser from the extraction section of the configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new()
            .with_iban_validation(config.validate_iban)
            .with_boilerplate(&config.extra_boilerplate)
    }

    /// Drop located IBANs whose checksum fails.
    pub fn with_iban_validation(mut self, validate: bool) -> Self {
        self.validate_iban = validate;
        self
    }

    /// Register extra boilerplate phrases.
    pub fn with_boilerplate<I, S>(mut self, phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.normalizer = self.normalizer.with_boilerplate(phrases);
        self
    }

    /// Parse per-page text fragments given in page order.
    pub fn parse_pages<S: AsRef<str>>(&self, pages: &[S]) -> Result<StatementRecord> {
        let start = Instant::now();
        let text = self.normalizer.normalize_pages(pages);
        debug!(
            "Normalized {} pages to {} characters",
            pages.len(),
            text.chars().count()
        );

        let record = self.assemble(&text)?;
        debug!(
            "Parsed statement {} - {} with {} transactions in {} ms",
            record.from_date,
            record.to_date,
            record.details.len(),
            start.elapsed().as_millis()
        );
        Ok(record)
    }

    /// Parse a single text fragment.
    pub fn parse_text(&self, text: &str) -> Result<StatementRecord> {
        self.parse_pages(&[text])
    }

    /// Parse UTF-8 encoded text.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<StatementRecord> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ExtractionError::MalformedInput(e.to_string()))?;
        self.parse_text(text)
    }

    fn assemble(&self, text: &str) -> Result<StatementRecord> {
        let RawFields {
            full_name,
            card_number,
            iban,
            currency,
            period,
            balances,
            totals,
        } = self.fields.extract(text)?;

        let from_date = parse_date(period.from, "fromDate")?;
        let to_date = parse_date(period.until, "toDate")?;

        let iban = iban.filter(|iban| {
            let keep = !self.validate_iban || validate_iban(iban);
            if !keep {
                debug!("Dropping IBAN {} with invalid checksum", iban);
            }
            keep
        });

        let details = self.transactions.extract(text)?;
        if details.is_empty() {
            debug!("No transaction lines found");
        }

        Ok(StatementRecord {
            financial_institution_name: FINANCIAL_INSTITUTION.to_string(),
            full_name,
            card_number: card_number.map(str::to_string),
            iban: iban.map(str::to_string),
            currency: currency.map(str::to_string),
            from_date,
            to_date,
            card_balance_date_from: parse_optional_amount(balances.from, AmountKind::BalanceFrom)?,
            card_balance_date_until: parse_optional_amount(
                balances.until,
                AmountKind::BalanceUntil,
            )?,
            replenishments: parse_optional_amount(
                totals.replenishments,
                AmountKind::Replenishments,
            )?,
            transfers: parse_optional_amount(totals.transfers, AmountKind::Transfers)?,
            purchases: parse_optional_amount(totals.purchases, AmountKind::Purchases)?,
            withdrawals: parse_optional_amount(totals.withdrawals, AmountKind::Withdrawals)?,
            others: parse_optional_amount(totals.others, AmountKind::Others)?,
            details,
        })
    }
}

impl Default for StatementParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementExtractor for StatementParser {
    fn extract_from_pages(&self, pages: &[String]) -> Result<StatementRecord> {
        self.parse_pages(pages)
    }

    fn extract_from_text(&self, text: &str) -> Result<StatementRecord> {
        self.parse_text(text)
    }
}
