//! Reconcile command - plan the reconciliation of a payable with a document.

use std::path::PathBuf;

use chrono::Utc;
use clap::Args;
use console::style;

use payrec_core::{plan_reconciliation, FieldExtractionEngine, ReconcileAction};

/// Arguments for the reconcile command.
#[derive(Args)]
pub struct ReconcileArgs {
    /// Input file (PDF or plain text)
    #[arg(required = true)]
    input: PathBuf,

    /// JSON file with an array of payables
    #[arg(short, long)]
    payables: PathBuf,

    /// Id of the payable to reconcile
    #[arg(long)]
    payable_id: String,

    /// Overwrite amount, due date and boleto codes with the extracted values
    #[arg(long)]
    update: bool,
}

pub async fn run(args: ReconcileArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = super::resolve_config(config_path)?;
    super::check_input(&args.input)?;

    let payables = super::load_payables(&args.payables)?;
    let Some(payable) = payables.iter().find(|p| p.id == args.payable_id) else {
        anyhow::bail!("Payable not found: {}", args.payable_id);
    };

    let record = super::extract_file(
        &FieldExtractionEngine::new().with_config(config.extraction),
        &args.input,
    );
    if record.is_failed() {
        anyhow::bail!("Cannot reconcile: {}", record.extraction_errors.join("; "));
    }

    let action = if args.update {
        ReconcileAction::UpdateAndConfirm
    } else {
        ReconcileAction::Confirm
    };
    let plan = plan_reconciliation(payable, &record, action, Utc::now());

    println!("{}", serde_json::to_string_pretty(&plan)?);
    eprintln!(
        "{} Planned reconciliation of {} with {} field updates",
        style("✓").green(),
        plan.payable_id,
        plan.updates.len()
    );

    Ok(())
}
