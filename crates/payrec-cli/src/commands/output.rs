//! Output formatting for records and match reports.

use payrec_core::extract::rules::tax_id::format_tax_id;
use payrec_core::{ExtractionRecord, MatchEntry, MatchReport};

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

const RECORD_HEADER: [&str; 14] = [
    "document_type",
    "total_amount",
    "due_date",
    "issue_date",
    "payee_name",
    "payee_tax_id",
    "payer_name",
    "payer_tax_id",
    "barcode",
    "digit_line",
    "internal_reference",
    "document_number",
    "confidence_score",
    "extraction_errors",
];

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn record_row(record: &ExtractionRecord) -> [String; 14] {
    [
        record.document_type.as_str().to_string(),
        opt(&record.total_amount),
        opt(&record.due_date),
        opt(&record.issue_date),
        opt(&record.payee_name),
        opt(&record.payee_tax_id),
        opt(&record.payer_name),
        opt(&record.payer_tax_id),
        opt(&record.barcode),
        opt(&record.digit_line),
        opt(&record.internal_reference),
        opt(&record.document_number),
        format!("{:.2}", record.confidence_score),
        record.extraction_errors.join("; "),
    ]
}

pub fn format_record(record: &ExtractionRecord, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(RECORD_HEADER)?;
            wtr.write_record(record_row(record))?;
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(format_record_text(record)),
    }
}

fn format_record_text(record: &ExtractionRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Document: {}\n", record.document_type.as_str()));
    if let Some(amount) = record.total_amount {
        output.push_str(&format!("Amount: R$ {}\n", amount));
    }
    if let Some(due_date) = record.due_date {
        output.push_str(&format!("Due: {}\n", due_date));
    }
    if let Some(issue_date) = record.issue_date {
        output.push_str(&format!("Issued: {}\n", issue_date));
    }
    output.push('\n');

    output.push_str("Payee:\n");
    output.push_str(&format!("  {}\n", record.payee_name.as_deref().unwrap_or("-")));
    if let Some(tax_id) = &record.payee_tax_id {
        output.push_str(&format!("  CNPJ: {}\n", format_tax_id(tax_id)));
    }
    output.push_str("Payer:\n");
    output.push_str(&format!("  {}\n", record.payer_name.as_deref().unwrap_or("-")));
    if let Some(tax_id) = &record.payer_tax_id {
        output.push_str(&format!("  CNPJ: {}\n", format_tax_id(tax_id)));
    }

    if let Some(barcode) = &record.barcode {
        output.push_str(&format!("\nBarcode: {}\n", barcode));
    }
    if let Some(number) = &record.document_number {
        output.push_str(&format!("Document number: {}\n", number));
    }

    for error in &record.extraction_errors {
        output.push_str(&format!("\nWarning: {}\n", error));
    }

    output
}

pub fn format_report(report: &MatchReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["class", "payable_id", "supplier_name", "score", "reasons", "divergences"])?;
            let classes = [("exact", &report.exact_matches), ("partial", &report.partial_matches)];
            for (class, entries) in classes {
                for entry in entries.iter() {
                    wtr.write_record([
                        class.to_string(),
                        entry.payable.id.clone(),
                        opt(&entry.payable.supplier_name),
                        entry.score.to_string(),
                        entry.reasons.join("; "),
                        entry.divergences.iter().map(|d| d.field.as_str()).collect::<Vec<_>>().join("; "),
                    ])?;
                }
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => Ok(format_report_text(report)),
    }
}

fn format_entry(entry: &MatchEntry) -> String {
    let mut output = format!(
        "  [{:>3}] {} {}\n",
        entry.score,
        entry.payable.id,
        entry.payable.supplier_name.as_deref().unwrap_or("")
    );
    for reason in &entry.reasons {
        output.push_str(&format!("        + {}\n", reason));
    }
    for divergence in &entry.divergences {
        output.push_str(&format!(
            "        ! {}: expected {}, found {}\n",
            divergence.field, divergence.expected, divergence.found
        ));
    }
    output
}

fn format_report_text(report: &MatchReport) -> String {
    let mut output = format!(
        "Checked {} payables, suggested action: {}\n",
        report.total_payables_checked,
        report.suggested_action.as_str()
    );

    if !report.exact_matches.is_empty() {
        output.push_str("\nExact matches:\n");
        report.exact_matches.iter().for_each(|e| output.push_str(&format_entry(e)));
    }
    if !report.partial_matches.is_empty() {
        output.push_str("\nPartial matches:\n");
        report.partial_matches.iter().for_each(|e| output.push_str(&format_entry(e)));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use payrec_core::{match_payables, FieldExtractionEngine};

    #[test]
    fn test_record_csv_has_header_and_row() {
        let record = FieldExtractionEngine::new().extract("Fatura Total: 10,00");
        let csv = format_record(&record, OutputFormat::Csv).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("document_type,total_amount"));
        assert!(lines[1].starts_with("fatura,10.00"));
    }

    #[test]
    fn test_empty_report_text() {
        let record = FieldExtractionEngine::new().extract("");
        let text = format_report(&match_payables(&record, &[]), OutputFormat::Text).unwrap();
        assert_eq!(text, "Checked 0 payables, suggested action: create_new_entry\n");
    }
}
