//! Extraction record produced from one billing document.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of billing document, decided by keyword presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Bank slip.
    Boleto,
    /// Invoice / bill.
    Fatura,
    /// Fiscal note (NF-e, DANFE).
    NotaFiscal,
    /// Receipt or payment voucher.
    Recibo,
    /// Nothing recognizable.
    Outros,
    /// The text could not be produced from the source document.
    Erro,
}

impl DocumentType {
    /// Classification order; the first type with a keyword hit wins.
    pub const PRIORITY: [DocumentType; 4] = [
        DocumentType::Boleto,
        DocumentType::Fatura,
        DocumentType::NotaFiscal,
        DocumentType::Recibo,
    ];

    /// Keywords looked up in case-folded text.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            DocumentType::Boleto => &["boleto", "código de barras", "linha digitável", "banco"],
            DocumentType::Fatura => &["fatura", "invoice", "cobrança"],
            DocumentType::NotaFiscal => &["nota fiscal", "nf-e", "danfe", "nfe"],
            DocumentType::Recibo => &["recibo", "comprovante"],
            DocumentType::Outros | DocumentType::Erro => &[],
        }
    }

    /// Classify already case-folded text.
    pub fn classify(text_lower: &str) -> Self {
        Self::PRIORITY
            .into_iter()
            .find(|doc_type| doc_type.keywords().iter().any(|k| text_lower.contains(k)))
            .unwrap_or(DocumentType::Outros)
    }

    /// Wire name, as used in JSON and CSV output.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Boleto => "boleto",
            DocumentType::Fatura => "fatura",
            DocumentType::NotaFiscal => "nota_fiscal",
            DocumentType::Recibo => "recibo",
            DocumentType::Outros => "outros",
            DocumentType::Erro => "erro",
        }
    }
}

/// Structured fields extracted from one document.
///
/// Built once by [`FieldExtractionEngine`](crate::extract::FieldExtractionEngine)
/// and only read afterwards. Absent fields serialize as `null`, never as an
/// empty string or zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Document classification.
    pub document_type: DocumentType,

    /// Source text, capped in length.
    pub raw_text: String,

    /// Main amount, always within the plausible range.
    pub total_amount: Option<Decimal>,

    /// Payment due date.
    pub due_date: Option<NaiveDate>,

    /// Issue date.
    pub issue_date: Option<NaiveDate>,

    /// Payee (beneficiário) name.
    pub payee_name: Option<String>,

    /// Payee tax id, 14 digits.
    pub payee_tax_id: Option<String>,

    /// Payer (pagador) name.
    pub payer_name: Option<String>,

    /// Payer tax id, 14 digits.
    pub payer_tax_id: Option<String>,

    /// Barcode, exactly 47 or 48 digits.
    pub barcode: Option<String>,

    /// Digit line as printed on the slip.
    pub digit_line: Option<String>,

    /// Bank-side reference (nosso número).
    pub internal_reference: Option<String>,

    /// Document / invoice number.
    pub document_number: Option<String>,

    /// Share of expected fields that were found (0.0 - 1.0).
    pub confidence_score: f32,

    /// Diagnostics gathered during extraction.
    #[serde(default)]
    pub extraction_errors: Vec<String>,
}

impl ExtractionRecord {
    /// Record for a document whose text could not be produced.
    pub fn failed(cause: impl std::fmt::Display) -> Self {
        Self {
            document_type: DocumentType::Erro,
            raw_text: String::new(),
            total_amount: None,
            due_date: None,
            issue_date: None,
            payee_name: None,
            payee_tax_id: None,
            payer_name: None,
            payer_tax_id: None,
            barcode: None,
            digit_line: None,
            internal_reference: None,
            document_number: None,
            confidence_score: 0.0,
            extraction_errors: vec![format!("failed to produce text: {}", cause)],
        }
    }

    /// Whether extraction failed outright.
    pub fn is_failed(&self) -> bool {
        self.document_type == DocumentType::Erro
    }

    /// Whether any tax id was found.
    pub fn has_tax_id(&self) -> bool {
        self.payee_tax_id.is_some() || self.payer_tax_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_priority() {
        assert_eq!(DocumentType::classify("boleto da fatura"), DocumentType::Boleto);
        assert_eq!(DocumentType::classify("fatura nf-e 123"), DocumentType::Fatura);
        assert_eq!(DocumentType::classify("danfe"), DocumentType::NotaFiscal);
        assert_eq!(DocumentType::classify("comprovante de pagamento"), DocumentType::Recibo);
        assert_eq!(DocumentType::classify("lorem ipsum"), DocumentType::Outros);
    }

    #[test]
    fn test_failed_record() {
        let record = ExtractionRecord::failed("boom");
        assert!(record.is_failed());
        assert!(record.raw_text.is_empty());
        assert_eq!(record.extraction_errors, vec!["failed to produce text: boom".to_string()]);
    }

    #[test]
    fn test_absent_fields_serialize_as_null() {
        let record = ExtractionRecord::failed("x");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["total_amount"].is_null());
        assert!(json["payee_name"].is_null());
        assert_eq!(json["document_type"], "erro");

        let back: ExtractionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
