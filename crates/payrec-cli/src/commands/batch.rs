//! Batch processing command for multiple billing documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use payrec_core::{
    BatchSummary, ExtractionRecord, FieldExtractionEngine, MatchReport, ReconciliationMatcher,
};

use super::matching::FilterArgs;
use super::output::{format_record, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Match every document against this JSON payables file
    #[arg(short, long)]
    payables: Option<PathBuf>,

    #[command(flatten)]
    filter: FilterArgs,

    /// Also write summary.csv and summary.json
    #[arg(long)]
    summary: bool,

    /// Continue when a document cannot be read
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    record: ExtractionRecord,
    report: Option<MatchReport>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::resolve_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| super::SUPPORTED_EXTENSIONS.contains(&super::extension_of(p).as_str()))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    let payables = match &args.payables {
        Some(path) => Some(args.filter.to_filter().apply(&super::load_payables(path)?)),
        None => None,
    };

    eprintln!("{} Found {} files to process", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let engine = FieldExtractionEngine::new().with_config(config.extraction);
    let matcher = ReconciliationMatcher::new().with_config(config.matching);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let record = super::extract_file(&engine, &path);

        if record.is_failed() {
            let message = record.extraction_errors.join("; ");
            if args.continue_on_error {
                warn!("Failed to process {}: {}", path.display(), message);
            } else {
                error!("Failed to process {}: {}", path.display(), message);
                pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", path.display(), message);
            }
        }

        let report = payables
            .as_deref()
            .filter(|_| !record.is_failed())
            .map(|payables| matcher.match_record(&record, payables));

        results.push(ProcessResult {
            path,
            record,
            report,
            processing_time_ms: file_start.elapsed().as_millis() as u64,
        });
        pb.inc(1);
    }

    pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            write_result(output_dir, result, args.format)?;
        }
    }

    let summary = BatchSummary::from_results(
        results.iter().map(|r| (&r.record, r.report.as_ref())),
    );

    if args.summary {
        let summary_dir = args.output_dir.clone().unwrap_or_else(|| PathBuf::from("."));
        write_summary_csv(&summary_dir.join("summary.csv"), &results)?;
        fs::write(summary_dir.join("summary.json"), serde_json::to_string_pretty(&summary)?)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_dir.display()
        );
    }

    let failed: Vec<_> = results.iter().filter(|r| r.record.is_failed()).collect();

    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        summary.total_files,
        start.elapsed()
    );
    println!("   Total amount: R$ {}", summary.total_amount);
    if payables.is_some() {
        println!(
            "   {} matched, {} unmatched",
            style(summary.matched_count).green(),
            style(summary.unmatched_count).yellow()
        );
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            println!(
                "  - {}: {}",
                result.path.display(),
                result.record.extraction_errors.join("; ")
            );
        }
    }

    Ok(())
}

fn write_result(output_dir: &Path, result: &ProcessResult, format: OutputFormat) -> anyhow::Result<()> {
    let stem = result
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("document");

    let output_path = output_dir.join(format!("{}.{}", stem, format.extension()));
    fs::write(&output_path, format_record(&result.record, format)?)?;
    debug!("Wrote output to {}", output_path.display());

    if let Some(report) = &result.report {
        let report_path = output_dir.join(format!("{}.match.json", stem));
        fs::write(&report_path, serde_json::to_string_pretty(report)?)?;
        debug!("Wrote match report to {}", report_path.display());
    }

    Ok(())
}

fn write_summary_csv(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "total_amount",
        "due_date",
        "payee_tax_id",
        "confidence",
        "suggested_action",
        "best_payable_id",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name().and_then(|s| s.to_str()).unwrap_or("");
        let record = &result.record;
        let status = if record.is_failed() { "error" } else { "success" };

        wtr.write_record([
            filename,
            status,
            record.document_type.as_str(),
            &record.total_amount.map(|a| a.to_string()).unwrap_or_default(),
            &record.due_date.map(|d| d.to_string()).unwrap_or_default(),
            record.payee_tax_id.as_deref().unwrap_or(""),
            &format!("{:.2}", record.confidence_score),
            result.report.as_ref().map(|r| r.suggested_action.as_str()).unwrap_or(""),
            result
                .report
                .as_ref()
                .and_then(|r| r.best())
                .map(|e| e.payable.id.as_str())
                .unwrap_or(""),
            &result.processing_time_ms.to_string(),
            &record.extraction_errors.join("; "),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
