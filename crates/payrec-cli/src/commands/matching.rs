//! Match command - find the payables a document settles.

use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::info;

use payrec_core::{FieldExtractionEngine, PayableFilter, ReconciliationMatcher, SuggestedAction};

use super::output::{format_report, OutputFormat};

/// Bounds applied to the payables file before matching.
#[derive(Args, Clone, Debug, Default)]
pub struct FilterArgs {
    /// Earliest due date considered (YYYY-MM-DD)
    #[arg(long)]
    min_date: Option<NaiveDate>,

    /// Latest due date considered (YYYY-MM-DD)
    #[arg(long)]
    max_date: Option<NaiveDate>,

    /// Smallest amount considered
    #[arg(long)]
    min_amount: Option<Decimal>,

    /// Largest amount considered
    #[arg(long)]
    max_amount: Option<Decimal>,

    /// Also consider payables already paid
    #[arg(long)]
    include_paid: bool,
}

impl FilterArgs {
    pub fn to_filter(&self) -> PayableFilter {
        PayableFilter::new()
            .with_date_range(self.min_date, self.max_date)
            .with_amount_range(self.min_amount, self.max_amount)
            .include_paid(self.include_paid)
    }
}

/// Arguments for the match command.
#[derive(Args)]
pub struct MatchArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// JSON file with an array of open payables
    #[arg(short, long)]
    payables: PathBuf,

    #[command(flatten)]
    filter: FilterArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: MatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::resolve_config(config_path)?;
    super::check_input(&args.input)?;

    let payables = args.filter.to_filter().apply(&super::load_payables(&args.payables)?);
    info!("Matching {} against {} payables", args.input.display(), payables.len());

    let engine = FieldExtractionEngine::new().with_config(config.extraction);
    let record = super::extract_file(&engine, &args.input);

    let report = ReconciliationMatcher::new()
        .with_config(config.matching)
        .match_record(&record, &payables);

    let output = format_report(&report, args.format)?;

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

    let hint = match report.suggested_action {
        SuggestedAction::ReconcileAutomatically => style("one exact match found").green(),
        SuggestedAction::SelectMatch => style("several exact matches, pick one").yellow(),
        SuggestedAction::ReviewManually => style("only partial matches, review manually").yellow(),
        SuggestedAction::CreateNewEntry => style("no matching payable").red(),
    };
    eprintln!("{} {}", style("ℹ").blue(), hint);

    Ok(())
}
