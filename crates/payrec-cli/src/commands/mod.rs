//! Subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod extract;
pub mod matching;
pub mod output;
pub mod reconcile;

use std::path::Path;

use tracing::debug;

use payrec_core::{
    ExtractionRecord, FieldExtractionEngine, PayableCandidate, PayrecConfig, PdfTextSource,
    PlainText, SourceError, TextSource,
};

/// File extensions accepted as document input.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "text"];

/// Load the `--config` file if given, else the default file if it exists.
pub fn resolve_config(config_path: Option<&str>) -> anyhow::Result<PayrecConfig> {
    match config_path {
        Some(path) => Ok(PayrecConfig::from_file(Path::new(path))?),
        None => config::load_or_default(&config::default_config_path()),
    }
}

pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Check that `path` exists and has a supported extension.
pub fn check_input(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    let extension = extension_of(path);
    if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        anyhow::bail!("Unsupported file format: {}", extension);
    }
    Ok(())
}

fn open_source(path: &Path) -> Result<Box<dyn TextSource>, SourceError> {
    let source: Box<dyn TextSource> = match extension_of(path).as_str() {
        "pdf" => Box::new(PdfTextSource::from_path(path)?),
        _ => Box::new(PlainText::from_path(path)?),
    };
    Ok(source)
}

/// Extract a document file. Unreadable files yield an error record.
pub fn extract_file(engine: &FieldExtractionEngine, path: &Path) -> ExtractionRecord {
    debug!("Extracting {}", path.display());
    match open_source(path) {
        Ok(source) => engine.extract_from_source(source.as_ref()),
        Err(e) => ExtractionRecord::failed(e),
    }
}

/// Read a JSON array of payables.
pub fn load_payables(path: &Path) -> anyhow::Result<Vec<PayableCandidate>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read payables file {}: {}", path.display(), e))?;
    let payables: Vec<PayableCandidate> = serde_json::from_str(&content)
        .map_err(|e| anyhow::anyhow!("Invalid payables file {}: {}", path.display(), e))?;

    debug!("Loaded {} payables from {}", payables.len(), path.display());
    Ok(payables)
}
