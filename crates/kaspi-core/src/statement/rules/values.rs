//! Amount and date normalization shared by the field and transaction rules.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::patterns::CURRENCY_SYMBOLS;
use crate::error::ExtractionError;
use crate::models::statement::DATE_FORMAT;

/// What an amount string represents; decides how its first character is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountKind {
    BalanceFrom,
    BalanceUntil,
    Replenishments,
    Transfers,
    Purchases,
    Withdrawals,
    Others,
    Transaction,
}

impl AmountKind {
    /// Balance amounts keep their sign character; every other kind treats the
    /// first character as a sign marker.
    pub fn is_balance(self) -> bool {
        matches!(self, AmountKind::BalanceFrom | AmountKind::BalanceUntil)
    }

    /// Output field name, used in conversion errors.
    pub fn field_name(self) -> &'static str {
        match self {
            AmountKind::BalanceFrom => "cardBalanceDateFrom",
            AmountKind::BalanceUntil => "cardBalanceDateUntil",
            AmountKind::Replenishments => "replenishments",
            AmountKind::Transfers => "transfers",
            AmountKind::Purchases => "purchases",
            AmountKind::Withdrawals => "withdrawals",
            AmountKind::Others => "others",
            AmountKind::Transaction => "amount",
        }
    }
}

/// Parse a statement amount such as `"+1 000,00 ₸"`.
///
/// Everything from the currency symbol on is dropped, whitespace removed and
/// the decimal comma turned into a period. Balance kinds are then parsed
/// whole. For all other kinds the first character is dropped unconditionally
/// and the value negated when that character was `-`.
pub fn parse_amount(raw: &str, kind: AmountKind) -> Result<f64, ExtractionError> {
    let numeric = normalize_amount(raw);

    let value = if kind.is_balance() {
        parse_signed(&numeric)
    } else {
        let mut chars = numeric.chars();
        let marker = chars.next();
        parse_unsigned(chars.as_str()).map(|v| if marker == Some('-') { -v } else { v })
    };

    value.ok_or_else(|| ExtractionError::conversion(kind.field_name(), raw))
}

/// [`parse_amount`] for fields that may be absent.
pub fn parse_optional_amount(
    raw: Option<&str>,
    kind: AmountKind,
) -> Result<Option<f64>, ExtractionError> {
    raw.map(|raw| parse_amount(raw, kind)).transpose()
}

/// Parse a strict `dd.mm.yy` date.
pub fn parse_date(raw: &str, field: &str) -> Result<NaiveDate, ExtractionError> {
    if !has_date_shape(raw) {
        return Err(ExtractionError::conversion(field, raw));
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ExtractionError::conversion(field, raw))
}

fn has_date_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 8
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'.',
            _ => b.is_ascii_digit(),
        })
}

fn normalize_amount(raw: &str) -> String {
    let numeric = match raw.find(CURRENCY_SYMBOLS) {
        Some(end) => &raw[..end],
        None => raw,
    };
    numeric
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect()
}

fn parse_signed(s: &str) -> Option<f64> {
    match s.strip_prefix('-') {
        Some(rest) => parse_unsigned(rest).map(|v| -v),
        None => parse_unsigned(s.strip_prefix('+').unwrap_or(s)),
    }
}

/// Digits with an optional fractional part. `f64::from_str` alone would also
/// take exponents, `inf` and `NaN`.
fn parse_unsigned(s: &str) -> Option<f64> {
    if !s.starts_with(|c: char| c.is_ascii_digit())
        || !s.chars().all(|c| c.is_ascii_digit() || c == '.')
    {
        return None;
    }
    Decimal::from_str(s).ok()?;
    s.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const NON_BALANCE: [AmountKind; 6] = [
        AmountKind::Replenishments,
        AmountKind::Transfers,
        AmountKind::Purchases,
        AmountKind::Withdrawals,
        AmountKind::Others,
        AmountKind::Transaction,
    ];

    #[test]
    fn test_parse_transaction_amounts() {
        assert_eq!(parse_amount("+500,00 ₸", AmountKind::Transaction).unwrap(), 500.0);
        assert_eq!(
            parse_amount("- 12 345,67 ₸", AmountKind::Transaction).unwrap(),
            -12345.67
        );
        assert_eq!(parse_amount("+1 000,00 ₸", AmountKind::Replenishments).unwrap(), 1000.0);
    }

    #[test]
    fn test_non_balance_drops_first_character() {
        for kind in NON_BALANCE {
            for rest in ["0,01", "7,50", "1 234,56", "999 999,99"] {
                let abs = parse_amount(&format!("+{} ₸", rest), kind).unwrap();
                assert_eq!(parse_amount(&format!("-{} ₸", rest), kind).unwrap(), -abs);
                // whatever the first character is, it is not part of the number
                assert_eq!(parse_amount(&format!("~{} ₸", rest), kind).unwrap(), abs);
            }
        }
        // an unsigned amount loses its leading digit
        assert_eq!(parse_amount("500,00 ₸", AmountKind::Transaction).unwrap(), 0.0);
    }

    #[test]
    fn test_balance_keeps_sign() {
        assert_eq!(parse_amount("-1234,56 ₸", AmountKind::BalanceFrom).unwrap(), -1234.56);
        assert_eq!(parse_amount("+10 000,00 ₸", AmountKind::BalanceUntil).unwrap(), 10000.0);
        assert_eq!(parse_amount("250,00 ₸", AmountKind::BalanceUntil).unwrap(), 250.0);
    }

    #[test]
    fn test_malformed_amount_is_conversion_error() {
        for raw in ["+ ₸", "+abc ₸", "+1e5 ₸", "+inf ₸", "--5,00 ₸", ""] {
            let err = parse_amount(raw, AmountKind::Transaction).unwrap_err();
            assert!(
                matches!(&err, ExtractionError::Conversion { field, value } if field == "amount" && value == raw),
                "{}: {:?}",
                raw,
                err
            );
        }
        assert!(parse_amount("NaN ₸", AmountKind::BalanceFrom).is_err());
    }

    #[test]
    fn test_absent_amount_is_none() {
        assert_eq!(parse_optional_amount(None, AmountKind::Others).unwrap(), None);
        assert_eq!(
            parse_optional_amount(Some("-0,50 ₸"), AmountKind::Others).unwrap(),
            Some(-0.5)
        );
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("05.01.23", "operationDate").unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 5).unwrap()
        );
        for raw in ["5.01.23", "05.01.2023", "2023-01-05", "32.01.23", "29.02.23", "05-01-23"] {
            assert!(parse_date(raw, "operationDate").is_err(), "{}", raw);
        }
    }

    #[test]
    fn test_date_round_trip() {
        for year in 0..100 {
            for (day, month) in [(1, 1), (28, 2), (30, 6), (31, 12)] {
                let raw = format!("{:02}.{:02}.{:02}", day, month, year);
                let date = parse_date(&raw, "fromDate").unwrap();
                assert_eq!(date.format(DATE_FORMAT).to_string(), raw);
            }
        }
    }
}
