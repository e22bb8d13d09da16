//! Extract command - pull fields from a single billing document.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use payrec_core::FieldExtractionEngine;

use super::output::{format_record, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence score
    #[arg(long)]
    show_confidence: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::resolve_config(config_path)?;
    super::check_input(&args.input)?;

    info!("Processing file: {}", args.input.display());

    let engine = FieldExtractionEngine::new().with_config(config.extraction);
    let record = super::extract_file(&engine, &args.input);

    if record.is_failed() {
        eprintln!(
            "{} {}",
            style("✗").red(),
            record.extraction_errors.join("; ")
        );
    }

    let output = format_record(&record, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        eprintln!();
        eprintln!(
            "{} Extraction confidence: {:.0}%",
            style("ℹ").blue(),
            record.confidence_score * 100.0
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
