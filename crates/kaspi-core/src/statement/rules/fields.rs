//! Scalar field extraction: holder, card, account, period, balances, totals.

use std::ops::RangeInclusive;

use super::patterns::{balance_pattern, pattern, Field};
use crate::error::ExtractionError;

/// Token positions the layout inserts after the holder's surname.
pub const LAYOUT_TOKEN_POSITIONS: RangeInclusive<usize> = 1..=3;

/// Period boundary dates as printed (`dd.mm.yy`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPeriod<'t> {
    pub from: &'t str,
    pub until: &'t str,
}

/// Balance strings tied to the period boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawBalances<'t> {
    pub from: Option<&'t str>,
    pub until: Option<&'t str>,
}

/// Category total strings; each may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTotals<'t> {
    pub replenishments: Option<&'t str>,
    pub transfers: Option<&'t str>,
    pub purchases: Option<&'t str>,
    pub withdrawals: Option<&'t str>,
    pub others: Option<&'t str>,
}

/// All scalar fields located in a normalized statement text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFields<'t> {
    pub full_name: String,
    pub card_number: Option<&'t str>,
    pub iban: Option<&'t str>,
    pub currency: Option<&'t str>,
    pub period: RawPeriod<'t>,
    pub balances: RawBalances<'t>,
    pub totals: RawTotals<'t>,
}

/// Locates scalar statement fields with the bilingual pattern table.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldExtractor;

impl FieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Locate every scalar field. Holder name and period are required.
    pub fn extract<'t>(&self, text: &'t str) -> Result<RawFields<'t>, ExtractionError> {
        let full_name = self.full_name(text)?;
        let period = self
            .boundary_dates(text)
            .ok_or_else(|| ExtractionError::MissingField("fromDate".to_string()))?;
        let balances = self.balances(text, &period)?;

        Ok(RawFields {
            full_name,
            card_number: self.card_number(text),
            iban: self.iban(text),
            currency: self.currency(text),
            period,
            balances,
            totals: self.category_totals(text),
        })
    }

    /// Holder name exactly as matched, layout tokens included.
    pub fn raw_full_name<'t>(&self, text: &'t str) -> Option<&'t str> {
        first(Field::FullName, text)
    }

    /// Holder name with layout tokens removed.
    pub fn full_name(&self, text: &str) -> Result<String, ExtractionError> {
        let raw = self
            .raw_full_name(text)
            .ok_or_else(|| ExtractionError::MissingField("fullName".to_string()))?;
        strip_layout_tokens(raw)
    }

    pub fn card_number<'t>(&self, text: &'t str) -> Option<&'t str> {
        first(Field::CardNumber, text)
    }

    pub fn iban<'t>(&self, text: &'t str) -> Option<&'t str> {
        first(Field::Iban, text)
    }

    pub fn currency<'t>(&self, text: &'t str) -> Option<&'t str> {
        first(Field::Currency, text)
    }

    /// Balance pass 1: the period boundary dates.
    pub fn boundary_dates<'t>(&self, text: &'t str) -> Option<RawPeriod<'t>> {
        let groups = pattern(Field::Period)?.first_groups(text)?;
        match groups.as_slice() {
            [from, until] => Some(RawPeriod {
                from: *from,
                until: *until,
            }),
            _ => None,
        }
    }

    /// Balance pass 2: the balance printed for one boundary date.
    pub fn balance_at<'t>(
        &self,
        text: &'t str,
        boundary: &str,
    ) -> Result<Option<&'t str>, ExtractionError> {
        Ok(balance_pattern(boundary)?.first(text))
    }

    /// Balances for both period boundaries.
    pub fn balances<'t>(
        &self,
        text: &'t str,
        period: &RawPeriod<'_>,
    ) -> Result<RawBalances<'t>, ExtractionError> {
        Ok(RawBalances {
            from: self.balance_at(text, period.from)?,
            until: self.balance_at(text, period.until)?,
        })
    }

    pub fn category_totals<'t>(&self, text: &'t str) -> RawTotals<'t> {
        RawTotals {
            replenishments: first(Field::Replenishments, text),
            transfers: first(Field::Transfers, text),
            purchases: first(Field::Purchases, text),
            withdrawals: first(Field::Withdrawals, text),
            others: first(Field::Others, text),
        }
    }
}

fn first(field: Field, text: &str) -> Option<&str> {
    pattern(field)?.first(text)
}

/// Remove the tokens at [`LAYOUT_TOKEN_POSITIONS`] from a matched holder name.
///
/// The statement layout places three placeholder tokens (masked initials)
/// right after the surname. This is a fix-up for that layout only, not name
/// parsing. A name too short to carry the placeholders is returned as printed;
/// an empty name is a validation failure.
pub fn strip_layout_tokens(raw: &str) -> Result<String, ExtractionError> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.is_empty() {
        return Err(ExtractionError::Validation {
            field: "fullName".to_string(),
            reason: format!("no name tokens in {:?}", raw),
        });
    }
    if tokens.len() <= *LAYOUT_TOKEN_POSITIONS.end() {
        return Ok(tokens.join(" "));
    }

    Ok(tokens
        .iter()
        .enumerate()
        .filter(|(i, _)| !LAYOUT_TOKEN_POSITIONS.contains(i))
        .map(|(_, token)| *token)
        .collect::<Vec<_>>()
        .join(" "))
}
