//! Bilingual pattern table for Kaspi statements.
//!
//! Every logical field maps to one sub-pattern per language. The variants are
//! compiled into a single alternation, so supporting another language means
//! adding rows here. Templates use `{date}` and `{amount}` placeholders.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use crate::models::statement::TransactionKind;

/// Statement language a pattern variant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Russian,
    Kazakh,
}

/// Logical statement fields.
///
/// `Balance` has no static pattern; it is built per boundary date by
/// [`balance_pattern`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    CardNumber,
    Iban,
    Currency,
    Period,
    Balance,
    Replenishments,
    Transfers,
    Purchases,
    Withdrawals,
    Others,
}

/// Language variants of one pattern.
pub type Variants = &'static [(Language, &'static str)];

/// `dd.mm.yy` date token.
pub const DATE: &str = r"\d{2}\.\d{2}\.\d{2}";

/// Amount with optional sign, space-grouped thousands, decimal comma and currency symbol.
pub const AMOUNT: &str = r"[+-]? ?\d{1,3}(?: ?\d{3})*,\d{2} ?[₸$€₽]";

/// Amount whose leading sign is mandatory (transaction lines).
pub const SIGNED_AMOUNT: &str = r"[+-] ?\d{1,3}(?: ?\d{3})*,\d{2} ?[₸$€₽]";

/// Currency symbols that terminate the numeric part of an amount.
pub const CURRENCY_SYMBOLS: &[char] = &['₸', '$', '€', '₽'];

pub const FIELD_PATTERNS: &[(Field, Variants)] = &[
    (
        Field::FullName,
        &[
            (Language::Russian, r"по {date} (.+?) Номер (?:карты|счета)"),
            (Language::Kazakh, r"{date} дейін (.+?) (?:Карта|Шот) нөмірі"),
        ],
    ),
    (
        Field::CardNumber,
        &[
            (Language::Russian, r"Номер карты: (\*\d{4})"),
            (Language::Kazakh, r"Карта нөмірі: (\*\d{4})"),
        ],
    ),
    (
        Field::Iban,
        &[
            (Language::Russian, r"Номер счета: (KZ\d{2}[0-9A-Z]{16})"),
            (Language::Kazakh, r"Шот нөмірі: (KZ\d{2}[0-9A-Z]{16})"),
        ],
    ),
    (
        Field::Currency,
        &[
            (Language::Russian, r"Валюта счета: (\S+)"),
            (Language::Kazakh, r"Шот валютасы: (\S+)"),
        ],
    ),
    (
        Field::Period,
        &[
            (Language::Russian, r"с ({date}) по ({date})"),
            (Language::Kazakh, r"({date}) бастап ({date}) дейін"),
        ],
    ),
    (
        Field::Replenishments,
        &[
            (Language::Russian, r"Пополнения ({amount})"),
            (Language::Kazakh, r"Толықтырулар ({amount})"),
        ],
    ),
    (
        Field::Transfers,
        &[
            (Language::Russian, r"Переводы ({amount})"),
            (Language::Kazakh, r"Аударымдар ({amount})"),
        ],
    ),
    (
        Field::Purchases,
        &[
            (Language::Russian, r"Покупки ({amount})"),
            (Language::Kazakh, r"Сатып алулар ({amount})"),
        ],
    ),
    (
        Field::Withdrawals,
        &[
            (Language::Russian, r"Снятия ({amount})"),
            (Language::Kazakh, r"Ақша алу ({amount})"),
        ],
    ),
    (
        Field::Others,
        &[
            (Language::Russian, r"Разное ({amount})"),
            (Language::Kazakh, r"Әртүрлі ({amount})"),
        ],
    ),
];

/// Balance lines, keyed by a boundary date substituted at run time.
pub const BALANCE_TEMPLATES: Variants = &[
    (Language::Russian, r"Доступно на {boundary}: ({amount})"),
    (Language::Kazakh, r"{boundary} қолжетімді: ({amount})"),
];

/// Operation tokens printed in the transaction table.
pub const TRANSACTION_TYPES: &[(TransactionKind, Variants)] = &[
    (
        TransactionKind::Replenishment,
        &[(Language::Russian, "Пополнение"), (Language::Kazakh, "Толықтыру")],
    ),
    (
        TransactionKind::Transfer,
        &[(Language::Russian, "Перевод"), (Language::Kazakh, "Аударым")],
    ),
    (
        TransactionKind::Purchase,
        &[(Language::Russian, "Покупка"), (Language::Kazakh, "Сатып алу")],
    ),
    (
        TransactionKind::Withdrawal,
        &[(Language::Russian, "Снятие"), (Language::Kazakh, "Ақша алу")],
    ),
    (
        TransactionKind::Other,
        &[(Language::Russian, "Разное"), (Language::Kazakh, "Әртүрлі")],
    ),
];

lazy_static! {
    pub static ref FIELDS: HashMap<Field, FieldPattern> = FIELD_PATTERNS
        .iter()
        .map(|(field, variants)| {
            let pattern = FieldPattern::compile(*field, variants.iter().map(|(_, p)| *p)).unwrap();
            (*field, pattern)
        })
        .collect();

    /// Date, signed amount and operation token of one transaction line.
    pub static ref TRANSACTION_HEAD: Regex = Regex::new(&transaction_head()).unwrap();

    /// Any date token; bounds the detail text of a transaction.
    pub static ref DATE_TOKEN: Regex = Regex::new(DATE).unwrap();
}

/// Compiled static pattern for one field.
pub fn pattern(field: Field) -> Option<&'static FieldPattern> {
    FIELDS.get(&field)
}

/// Build the balance pattern for one boundary date.
pub fn balance_pattern(boundary: &str) -> Result<FieldPattern, regex::Error> {
    let boundary = regex::escape(boundary);
    let variants: Vec<String> = BALANCE_TEMPLATES
        .iter()
        .map(|(_, template)| template.replace("{boundary}", &boundary))
        .collect();
    FieldPattern::compile(Field::Balance, variants.iter().map(String::as_str))
}

fn expand(template: &str) -> String {
    template.replace("{date}", DATE).replace("{amount}", AMOUNT)
}

fn transaction_head() -> String {
    let mut tokens: Vec<&str> = TRANSACTION_TYPES
        .iter()
        .flat_map(|(_, variants)| variants.iter().map(|(_, token)| *token))
        .collect();
    // longest first so multi-word tokens win over their prefixes
    tokens.sort_by_key(|token| std::cmp::Reverse(token.chars().count()));
    let types = tokens
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join("|");

    format!(r"\b({}) ({}) ({})\b", DATE, SIGNED_AMOUNT, types)
}

/// A field pattern: all language variants joined into one alternation.
///
/// Each variant has the same number of capture groups (`arity`); the groups of
/// variant `v` occupy indices `v * arity + 1 ..= (v + 1) * arity`.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    field: Field,
    regex: Regex,
    arity: usize,
    variants: usize,
}

impl FieldPattern {
    /// Compile language variants of one field.
    pub fn compile<'a>(
        field: Field,
        variants: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, regex::Error> {
        let expanded: Vec<String> = variants.into_iter().map(expand).collect();

        let arity = match expanded.first() {
            Some(first) => Regex::new(first)?.captures_len() - 1,
            None => 0,
        };
        let combined = expanded
            .iter()
            .map(|variant| format!("(?:{})", variant))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&combined)?;
        debug_assert_eq!(regex.captures_len() - 1, arity * expanded.len());

        Ok(Self {
            field,
            regex,
            arity,
            variants: expanded.len(),
        })
    }

    pub fn field(&self) -> Field {
        self.field
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// First non-empty capture group across all matches, in document order.
    pub fn first<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.captures_iter(text).find_map(|caps| {
            caps.iter()
                .skip(1)
                .flatten()
                .map(|m| m.as_str())
                .find(|s| !s.is_empty())
        })
    }

    /// Groups of the first variant whose captures are all non-empty.
    pub fn first_groups<'t>(&self, text: &'t str) -> Option<Vec<&'t str>> {
        self.regex
            .captures_iter(text)
            .find_map(|caps| (0..self.variants).find_map(|v| self.variant_groups(&caps, v)))
    }

    fn variant_groups<'t>(&self, caps: &Captures<'t>, variant: usize) -> Option<Vec<&'t str>> {
        let start = variant * self.arity + 1;
        (start..start + self.arity)
            .map(|i| caps.get(i).map(|m| m.as_str()).filter(|s| !s.is_empty()))
            .collect()
    }
}
