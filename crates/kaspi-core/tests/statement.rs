use chrono::NaiveDate;
use kaspi_core::statement::rules::{strip_layout_tokens, FieldExtractor};
use kaspi_core::statement::TextNormalizer;
use kaspi_core::{ExtractionError, StatementExtractor, StatementParser, TransactionKind};
use pretty_assertions::assert_eq;

const STATEMENT_RU: &str = include_str!("fixtures/statement_ru.txt");
const STATEMENT_KZ: &str = include_str!("fixtures/statement_kz.txt");

fn pages(fixture: &str) -> Vec<String> {
    fixture.split('\x0c').map(str::to_string).collect()
}

fn date(d: u32, m: u32, y: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn russian_statement() {
    let record = StatementParser::new()
        .extract_from_pages(&pages(STATEMENT_RU))
        .unwrap();

    assert_eq!(record.full_name, "Иванов Иван Иванович");
    assert_eq!(record.card_number.as_deref(), Some("*4417"));
    assert_eq!(record.iban.as_deref(), Some("KZ84722C000012345678"));
    assert_eq!(record.from_date, date(1, 1, 2023));
    assert_eq!(record.to_date, date(31, 1, 2023));
    assert_eq!(record.card_balance_date_from, Some(10000.0));
    assert_eq!(record.card_balance_date_until, Some(5250.0));

    let kinds: Vec<_> = record.details.iter().map(|t| t.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            Some(TransactionKind::Replenishment),
            Some(TransactionKind::Transfer),
            Some(TransactionKind::Purchase),
            Some(TransactionKind::Purchase),
        ]
    );
    assert_eq!(record.details[2].detail, "Magnum Cash&Carry");
    assert_eq!(record.details[3].detail, "Yandex Go");
    assert!(record.validate().is_empty(), "{:?}", record.validate());
}

#[test]
fn kazakh_statement() {
    let record = StatementParser::new()
        .extract_from_pages(&pages(STATEMENT_KZ))
        .unwrap();

    assert_eq!(record.full_name, "Серікбаев Серік Болатұлы");
    assert_eq!(record.card_number.as_deref(), Some("*1234"));
    assert_eq!(record.iban.as_deref(), Some("KZ11722S000098765432"));
    assert_eq!(record.currency.as_deref(), Some("KZT"));
    assert_eq!(record.from_date, date(1, 3, 2024));
    assert_eq!(record.to_date, date(31, 3, 2024));
    assert_eq!(record.card_balance_date_from, Some(2000.0));
    assert_eq!(record.card_balance_date_until, Some(3500.0));
    assert_eq!(record.replenishments, Some(5000.0));
    assert_eq!(record.withdrawals, Some(-500.0));

    let types: Vec<&str> = record
        .details
        .iter()
        .map(|t| t.transaction_type.as_str())
        .collect();
    assert_eq!(types, vec!["Толықтыру", "Аударым", "Сатып алу", "Ақша алу"]);
    assert_eq!(record.details[3].detail, "Банкомат Kaspi");
    assert!(record.validate().is_empty(), "{:?}", record.validate());
}

#[test]
fn serialized_record_shape() {
    let record = StatementParser::new().parse_text(STATEMENT_KZ).unwrap();
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["financialInstitutionName"], "Kaspi Bank");
    assert_eq!(json["fromDate"], "01.03.24");
    assert_eq!(json["cardBalanceDateUntil"], 3500.0);
    assert_eq!(json["details"].as_array().unwrap().len(), 4);
    assert_eq!(json["details"][1]["amount"], -1200.0);
    assert_eq!(json["details"][1]["operationDate"], "04.03.24");
}

#[test]
fn page_split_does_not_matter() {
    let parser = StatementParser::new();
    let by_pages = parser.extract_from_pages(&pages(STATEMENT_RU)).unwrap();
    let whole = parser.extract_from_text(&STATEMENT_RU.replace('\x0c', "\n")).unwrap();
    assert_eq!(by_pages, whole);
}

#[test]
fn reparsing_is_idempotent() {
    let parser = StatementParser::new();
    let first = parser.extract_from_pages(&pages(STATEMENT_RU)).unwrap();
    let second = parser.extract_from_pages(&pages(STATEMENT_RU)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn holder_name_fix_up() {
    let normalized = TextNormalizer::new().normalize(STATEMENT_RU);
    let extractor = FieldExtractor::new();

    let raw = extractor.raw_full_name(&normalized).unwrap();
    assert_eq!(raw, "Иванов И. * * Иван Иванович");
    assert_eq!(strip_layout_tokens(raw).unwrap(), "Иванов Иван Иванович");
}

#[test]
fn empty_transaction_table() {
    let header = STATEMENT_RU.split("Дата Сумма").next().unwrap();
    let record = StatementParser::new().parse_text(header).unwrap();

    assert!(record.details.is_empty());
    assert_eq!(record.transfers, Some(-3500.0));
}

#[test]
fn missing_holder_name() {
    let text = STATEMENT_RU.replace("Номер карты", "Карта").replace("Номер счета", "Счет");
    let err = StatementParser::new().parse_text(&text).unwrap_err();
    assert!(matches!(err, ExtractionError::MissingField(ref f) if f == "fullName"));
}

#[test]
fn bad_operation_date_aborts() {
    let text = STATEMENT_RU.replace("05.01.23 +1 000,00 ₸", "35.01.23 +1 000,00 ₸");
    let err = StatementParser::new().parse_text(&text).unwrap_err();
    assert!(matches!(
        err,
        ExtractionError::Conversion { ref field, ref value } if field == "operationDate" && value == "35.01.23"
    ));
}

#[test]
fn printed_name_without_placeholders() {
    let text = "по 01.01.23 Иванов Иван Иванович Номер счета: ... за период с 01.01.23 по 31.01.23 ... \
                Пополнения +1 000,00 ₸ ... 05.01.23 +500,00 ₸ Пополнение Salary";
    let record = StatementParser::new().parse_text(text).unwrap();

    assert_eq!(record.full_name, "Иванов Иван Иванович");
    assert_eq!(record.from_date, date(1, 1, 2023));
    assert_eq!(record.to_date, date(31, 1, 2023));
    assert_eq!(record.replenishments, Some(1000.0));
    assert_eq!(record.iban, None);
    assert_eq!(record.details.len(), 1);
    assert_eq!(record.details[0].operation_date, date(5, 1, 2023));
    assert_eq!(record.details[0].amount, 500.0);
    assert_eq!(record.details[0].transaction_type, "Пополнение");
    assert_eq!(record.details[0].detail, "Salary");
}
