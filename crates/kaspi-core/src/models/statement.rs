//! Kaspi Bank statement data models.

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::statement::rules::iban::validate_iban;
use crate::statement::rules::patterns::TRANSACTION_TYPES;

/// Institution name reported for every statement of this document family.
pub const FINANCIAL_INSTITUTION: &str = "Kaspi Bank";

/// Date format used by the statement and by serialized records.
pub const DATE_FORMAT: &str = "%d.%m.%y";

/// A complete statement extracted from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRecord {
    /// Issuing institution.
    pub financial_institution_name: String,

    /// Account holder, with layout tokens removed.
    pub full_name: String,

    /// Masked card number (`*1234`).
    pub card_number: Option<String>,

    /// Account IBAN.
    pub iban: Option<String>,

    /// Account currency as printed.
    pub currency: Option<String>,

    /// First day of the statement period.
    #[serde(with = "short_date")]
    pub from_date: NaiveDate,

    /// Last day of the statement period.
    #[serde(with = "short_date")]
    pub to_date: NaiveDate,

    /// Available balance on the first day of the period.
    pub card_balance_date_from: Option<f64>,

    /// Available balance on the last day of the period.
    pub card_balance_date_until: Option<f64>,

    /// Category total: replenishments.
    pub replenishments: Option<f64>,

    /// Category total: transfers.
    pub transfers: Option<f64>,

    /// Category total: purchases.
    pub purchases: Option<f64>,

    /// Category total: withdrawals.
    pub withdrawals: Option<f64>,

    /// Category total: other operations.
    pub others: Option<f64>,

    /// Transactions in document order.
    pub details: Vec<TransactionRecord>,
}

/// A single statement line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    /// Operation date.
    #[serde(with = "short_date")]
    pub operation_date: NaiveDate,

    /// Signed amount.
    pub amount: f64,

    /// Operation token exactly as printed (either language).
    pub transaction_type: String,

    /// Free-text details.
    pub detail: String,
}

impl TransactionRecord {
    /// Typed view of the operation token.
    pub fn kind(&self) -> Option<TransactionKind> {
        TransactionKind::from_token(&self.transaction_type)
    }
}

/// Operation categories used by Kaspi statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Replenishment,
    Transfer,
    Purchase,
    Withdrawal,
    Other,
}

impl TransactionKind {
    pub const ALL: [TransactionKind; 5] = [
        TransactionKind::Replenishment,
        TransactionKind::Transfer,
        TransactionKind::Purchase,
        TransactionKind::Withdrawal,
        TransactionKind::Other,
    ];

    /// Resolve a surface token in any supported language.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        TRANSACTION_TYPES
            .iter()
            .find(|(_, variants)| variants.iter().any(|(_, t)| *t == token))
            .map(|(kind, _)| *kind)
    }

    /// Surface tokens for this kind, one per language.
    pub fn tokens(self) -> impl Iterator<Item = &'static str> {
        TRANSACTION_TYPES
            .iter()
            .filter(move |(kind, _)| *kind == self)
            .flat_map(|(_, variants)| variants.iter().map(|(_, t)| *t))
    }
}

impl StatementRecord {
    /// Category totals paired with the kind they aggregate.
    pub fn category_totals(&self) -> [(TransactionKind, Option<f64>); 5] {
        [
            (TransactionKind::Replenishment, self.replenishments),
            (TransactionKind::Transfer, self.transfers),
            (TransactionKind::Purchase, self.purchases),
            (TransactionKind::Withdrawal, self.withdrawals),
            (TransactionKind::Other, self.others),
        ]
    }

    /// Check the statement for internal inconsistencies.
    ///
    /// Amounts are compared in whole cents. Nothing here is fatal; the
    /// issues are meant for the operator.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.from_date > self.to_date {
            issues.push(format!(
                "Period start {} is after period end {}",
                format_short_date(self.from_date),
                format_short_date(self.to_date)
            ));
        }

        if let Some(iban) = self.iban.as_deref().filter(|iban| !validate_iban(iban)) {
            issues.push(format!("IBAN {} fails the mod-97 checksum", iban));
        }

        if let (Some(from), Some(until)) =
            (self.card_balance_date_from, self.card_balance_date_until)
        {
            let movement: Decimal = self.details.iter().map(|t| cents(t.amount)).sum();
            let expected = cents(from) + movement;
            if expected != cents(until) {
                issues.push(format!(
                    "Opening balance {} plus transactions {} gives {}, statement shows {}",
                    cents(from),
                    movement,
                    expected,
                    cents(until)
                ));
            }
        }

        for (kind, total) in self.category_totals() {
            let Some(total) = total else { continue };
            let sum: Decimal = self
                .details
                .iter()
                .filter(|t| t.kind() == Some(kind))
                .map(|t| cents(t.amount))
                .sum();
            if sum != cents(total) {
                issues.push(format!(
                    "{:?} total {} differs from transaction sum {}",
                    kind,
                    cents(total),
                    sum
                ));
            }
        }

        issues
    }
}

fn cents(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default().round_dp(2)
}

/// Format a date the way the statement prints it.
pub fn format_short_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

mod short_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}
