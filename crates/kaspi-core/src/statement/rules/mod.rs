//! Rule-based extractors for Kaspi statements.

pub mod fields;
pub mod iban;
pub mod patterns;
pub mod transactions;
pub mod values;

pub use fields::{strip_layout_tokens, FieldExtractor, RawFields, RawPeriod};
pub use iban::{format_iban, validate_iban};
pub use patterns::{Field, Language};
pub use transactions::{RawTransaction, TransactionExtractor};
pub use values::{parse_amount, parse_date, parse_optional_amount, AmountKind};
