//! Output formats for extracted statements.

use std::io::Write;

use kaspi_core::models::statement::format_short_date;
use kaspi_core::statement::rules::format_iban;
use kaspi_core::StatementRecord;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per transaction
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Statement columns repeated on every transaction row.
pub const STATEMENT_COLUMNS: [&str; 14] = [
    "financial_institution_name",
    "full_name",
    "card_number",
    "iban",
    "currency",
    "from_date",
    "to_date",
    "card_balance_date_from",
    "card_balance_date_until",
    "replenishments",
    "transfers",
    "purchases",
    "withdrawals",
    "others",
];

pub const TRANSACTION_COLUMNS: [&str; 4] = ["operation_date", "amount", "transaction_type", "detail"];

pub fn format_statement(record: &StatementRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => format_csv(record),
        OutputFormat::Text => Ok(format_text(record)),
    }
}

/// Header for flattened rows, after any leading columns.
pub fn csv_header(leading: &[&str]) -> Vec<String> {
    leading
        .iter()
        .chain(STATEMENT_COLUMNS.iter())
        .chain(TRANSACTION_COLUMNS.iter())
        .map(|c| c.to_string())
        .collect()
}

/// Write one row per transaction, each repeating the statement fields
/// between the `leading` and `trailing` columns.
///
/// A statement without transactions still gets one row.
pub fn write_rows<W: Write>(
    wtr: &mut csv::Writer<W>,
    leading: &[&str],
    record: &StatementRecord,
    trailing: &[&str],
) -> anyhow::Result<()> {
    let parent = statement_fields(record);

    let mut write = |transaction: [String; 4]| -> anyhow::Result<()> {
        let row = leading
            .iter()
            .map(|s| s.to_string())
            .chain(parent.iter().cloned())
            .chain(transaction)
            .chain(trailing.iter().map(|s| s.to_string()));
        wtr.write_record(row)?;
        Ok(())
    };

    if record.details.is_empty() {
        write(Default::default())?;
    }
    for t in &record.details {
        write([
            format_short_date(t.operation_date),
            t.amount.to_string(),
            t.transaction_type.clone(),
            t.detail.clone(),
        ])?;
    }

    Ok(())
}

fn statement_fields(record: &StatementRecord) -> Vec<String> {
    let amount = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    vec![
        record.financial_institution_name.clone(),
        record.full_name.clone(),
        record.card_number.clone().unwrap_or_default(),
        record.iban.clone().unwrap_or_default(),
        record.currency.clone().unwrap_or_default(),
        format_short_date(record.from_date),
        format_short_date(record.to_date),
        amount(record.card_balance_date_from),
        amount(record.card_balance_date_until),
        amount(record.replenishments),
        amount(record.transfers),
        amount(record.purchases),
        amount(record.withdrawals),
        amount(record.others),
    ]
}

fn format_csv(record: &StatementRecord) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(csv_header(&[]))?;
    write_rows(&mut wtr, &[], record, &[])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(record: &StatementRecord) -> String {
    let currency = record.currency.as_deref().unwrap_or("");
    let amount = |v: Option<f64>| match v {
        Some(v) => format!("{:.2} {}", v, currency),
        None => "-".to_string(),
    };

    let mut output = String::new();

    output.push_str(&format!("Statement: {}\n", record.financial_institution_name));
    output.push_str(&format!("Holder: {}\n", record.full_name));
    if let Some(card) = &record.card_number {
        output.push_str(&format!("Card: {}\n", card));
    }
    if let Some(iban) = &record.iban {
        output.push_str(&format!("IBAN: {}\n", format_iban(iban)));
    }
    output.push_str(&format!(
        "Period: {} - {}\n",
        format_short_date(record.from_date),
        format_short_date(record.to_date)
    ));
    output.push('\n');

    output.push_str("Balance:\n");
    output.push_str(&format!("  Opening: {}\n", amount(record.card_balance_date_from)));
    output.push_str(&format!("  Closing: {}\n", amount(record.card_balance_date_until)));
    output.push('\n');

    output.push_str("Totals:\n");
    output.push_str(&format!("  Replenishments: {}\n", amount(record.replenishments)));
    output.push_str(&format!("  Transfers:      {}\n", amount(record.transfers)));
    output.push_str(&format!("  Purchases:      {}\n", amount(record.purchases)));
    output.push_str(&format!("  Withdrawals:    {}\n", amount(record.withdrawals)));
    output.push_str(&format!("  Others:         {}\n", amount(record.others)));
    output.push('\n');

    output.push_str(&format!("Transactions ({}):\n", record.details.len()));
    for t in &record.details {
        output.push_str(&format!(
            "  {} {:>12.2} {} {}\n",
            format_short_date(t.operation_date),
            t.amount,
            t.transaction_type,
            t.detail
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaspi_core::StatementParser;
    use pretty_assertions::assert_eq;

    const TEXT: &str = "с 01.01.23 по 31.01.23 Иванов И. * * Иван Номер карты: *1234 \
                        Номер счета: KZ84722C000012345678 \
                        05.01.23 +500,00 ₸ Пополнение Salary 06.01.23 -120,50 ₸ Покупка Small";

    fn record() -> StatementRecord {
        StatementParser::new().parse_text(TEXT).unwrap()
    }

    #[test]
    fn test_csv_one_row_per_transaction() {
        let csv = format_statement(&record(), OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("financial_institution_name,full_name,"));
        assert!(lines[0].ends_with("operation_date,amount,transaction_type,detail"));
        assert!(lines[1].starts_with("Kaspi Bank,Иванов Иван,*1234,KZ84722C000012345678,"));
        assert!(lines[1].ends_with("05.01.23,500,Пополнение,Salary"));
        assert!(lines[2].ends_with("06.01.23,-120.5,Покупка,Small"));
    }

    #[test]
    fn test_csv_without_transactions() {
        let mut record = record();
        record.details.clear();

        let mut wtr = csv::Writer::from_writer(vec![]);
        write_rows(&mut wtr, &["a.txt", "success"], &record, &[]).unwrap();
        let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();

        assert_eq!(data.lines().count(), 1);
        assert!(data.starts_with("a.txt,success,Kaspi Bank,"));
        assert!(data.trim_end().ends_with(",,,,"));
    }

    #[test]
    fn test_header_width_matches_rows() {
        let header = csv_header(&["filename"]);
        assert_eq!(header.len(), 1 + STATEMENT_COLUMNS.len() + TRANSACTION_COLUMNS.len());
    }

    #[test]
    fn test_text_summary() {
        let text = format_statement(&record(), OutputFormat::Text).unwrap();
        assert!(text.contains("Holder: Иванов Иван"));
        assert!(text.contains("IBAN: KZ84 722C 0000 1234 5678"));
        assert!(text.contains("Period: 01.01.23 - 31.01.23"));
        assert!(text.contains("Transactions (2):"));
        assert!(text.contains("Opening: -"));
    }

    #[test]
    fn test_json_uses_camel_case() {
        let json = format_statement(&record(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"fullName\": \"Иванов Иван\""));
        assert!(json.contains("\"operationDate\": \"05.01.23\""));
    }
}
