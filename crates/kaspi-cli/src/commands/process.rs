//! Process command - extract a single statement.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use kaspi_core::models::statement::format_short_date;
use kaspi_core::StatementParser;

use super::export::{format_statement, OutputFormat};
use super::input::load_pages;
use super::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF, or text with form-feed page breaks)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Input holds a base64-encoded PDF
    #[arg(long)]
    base64: bool,

    /// Report inconsistencies between balances, totals and transactions
    #[arg(long)]
    validate: bool,

    /// Parse and report without writing output
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading input...");
    pb.set_position(10);
    let pages = load_pages(&args.input, args.base64, &config)?;
    debug!("Read {} pages", pages.len());

    pb.set_message("Extracting statement...");
    pb.set_position(60);
    let parser = StatementParser::from_config(&config.extraction);
    let record = parser.parse_pages(&pages)?;

    pb.finish_and_clear();

    if args.validate {
        let issues = record.validate();
        if issues.is_empty() {
            eprintln!("{} Statement is consistent", style("✓").green());
        } else {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    if args.dry_run {
        eprintln!(
            "{} {}: {}, {} - {}, {} transactions",
            style("ℹ").blue(),
            args.input.display(),
            record.full_name,
            format_short_date(record.from_date),
            format_short_date(record.to_date),
            record.details.len()
        );
        debug!("Total processing time: {:?}", start.elapsed());
        return Ok(());
    }

    let output = format_statement(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
