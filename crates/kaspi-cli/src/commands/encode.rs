//! Encode command - base64-encode a statement for upload.

use std::fs;
use std::path::PathBuf;

use base64::{engine::general_purpose, Engine as _};
use clap::Args;
use console::style;
use tracing::debug;

/// Arguments for the encode command.
#[derive(Args)]
pub struct EncodeArgs {
    /// File to encode
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(args: EncodeArgs) -> anyhow::Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let bytes = fs::read(&args.input)?;
    let encoded = general_purpose::STANDARD.encode(&bytes);
    debug!("Encoded {} bytes to {} characters", bytes.len(), encoded.len());

    match &args.output {
        Some(output_path) => {
            fs::write(output_path, &encoded)?;
            eprintln!(
                "{} Encoded {} written to {}",
                style("✓").green(),
                args.input.display(),
                output_path.display()
            );
        }
        None => println!("{}", encoded),
    }

    Ok(())
}
