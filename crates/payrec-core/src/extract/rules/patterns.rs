//! Recognition rules for Brazilian billing documents.
//!
//! Every field owns an ordered rule table. Labeled patterns come before
//! generic ones so that stray numbers are only picked up when nothing more
//! specific matched.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

/// One entry in a field's rule table.
#[derive(Debug)]
pub struct Rule<T = ()> {
    /// Short name, used in logs.
    pub name: &'static str,
    /// Compiled pattern; capture group 1 holds the value.
    pub regex: Regex,
    /// Per-rule data, e.g. the date layout the pattern matches.
    pub tag: T,
    /// Confidence attached to values found by this rule. Diagnostic only:
    /// the record's `confidence_score` counts fields present, not how they
    /// were found.
    pub confidence: f32,
}

impl Rule<()> {
    fn new(name: &'static str, pattern: &str, confidence: f32) -> Self {
        Self::tagged(name, pattern, (), confidence)
    }
}

impl<T> Rule<T> {
    fn tagged(name: &'static str, pattern: &str, tag: T, confidence: f32) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
            tag,
            confidence,
        }
    }
}

/// Try `rules` in order and return the first value `accept` produces.
///
/// Within a rule, matches are visited left to right. A rule whose matches
/// are all rejected does not stop the search; the first accepted value
/// ends it, so later rules are never consulted.
pub fn first_accepted<'r, 't, T, V>(
    rules: &'r [Rule<T>],
    text: &'t str,
    mut accept: impl FnMut(&'r Rule<T>, &Captures<'t>) -> Option<V>,
) -> Option<V> {
    rules.iter().find_map(|rule| {
        rule.regex
            .captures_iter(text)
            .find_map(|caps| accept(rule, &caps))
    })
}

/// Layout of a date rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `31/12/2024`
    DayMonthYearSlash,
    /// `31-12-2024`
    DayMonthYearDash,
    /// `2024-12-31`
    YearMonthDay,
}

impl DateFormat {
    /// `chrono` format string for this layout.
    pub fn chrono_format(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYearSlash => "%d/%m/%Y",
            DateFormat::DayMonthYearDash => "%d-%m-%Y",
            DateFormat::YearMonthDay => "%Y-%m-%d",
        }
    }
}

lazy_static! {
    // Amounts: "Valor: R$ 1.500,00", "R$ 1.500,00", then a bare "1.500,00".
    pub static ref AMOUNT_RULES: [Rule; 3] = [
        Rule::new(
            "labeled",
            r"(?i)(?:valor|total|quantia|r\$)\s*[:=]?\s*R?\$?\s*([\d.,]+)",
            0.95,
        ),
        Rule::new("currency", r"(?i)R\$\s*([\d.,]+)", 0.9),
        Rule::new("bare", r"(\d{1,3}(?:\.\d{3})*,\d{2})", 0.7),
    ];

    pub static ref DATE_RULES: [Rule<DateFormat>; 3] = [
        Rule::tagged("dd/mm/yyyy", r"(\d{2}/\d{2}/\d{4})", DateFormat::DayMonthYearSlash, 0.9),
        Rule::tagged("dd-mm-yyyy", r"(\d{2}-\d{2}-\d{4})", DateFormat::DayMonthYearDash, 0.9),
        Rule::tagged("yyyy-mm-dd", r"(\d{4}-\d{2}-\d{2})", DateFormat::YearMonthDay, 0.9),
    ];

    // CNPJ, punctuation optional: 12.345.678/0001-90 or 12345678000190.
    pub static ref TAX_ID_RULES: [Rule; 1] = [
        Rule::new("cnpj", r"(\d{2}\.?\d{3}\.?\d{3}/?\d{4}-?\d{2})", 0.9),
    ];

    pub static ref BARCODE_RULES: [Rule; 2] = [
        Rule::new(
            "grouped",
            r"(?i)\b(\d{5}\.?\d{5}\s*\d{5}\.?\d{6}\s*\d{5}\.?\d{6}\s*\d\s*\d{14})\b",
            0.9,
        ),
        Rule::new("flat", r"(?i)\b(\d{47,48})\b", 0.8),
    ];

    pub static ref DIGIT_LINE_RULES: [Rule; 1] = [
        Rule::new(
            "digit_line",
            r"(?i)\b(\d{5}\.\d{5}\s+\d{5}\.\d{6}\s+\d{5}\.\d{6}\s+\d\s+\d{14})\b",
            0.9,
        ),
    ];

    // Nosso número / N. documento.
    pub static ref INTERNAL_REFERENCE_RULES: [Rule; 1] = [
        Rule::new(
            "nosso_numero",
            r"(?i)(?:nosso\s*n[úu]mero|n\.?\s*documento)\s*[:=]?\s*(\d+[\d\-./]*)",
            0.9,
        ),
    ];

    pub static ref DOCUMENT_NUMBER_RULES: [Rule; 2] = [
        Rule::new(
            "labeled",
            r"(?i)(?:n[úu]mero|nf|nota|fatura|documento)\s*[:=]?\s*(\d+)",
            0.85,
        ),
        Rule::new("short", r"(?i)(?:doc|ref)\s*[:=]?\s*(\d+)", 0.7),
    ];

    // Names run until the end of the line or a CNPJ/CPF label.
    pub static ref PAYEE_NAME_RULES: [Rule; 2] = [
        Rule::new(
            "beneficiario",
            r"(?i)(?:benefici[áa]rio|cedente|favorecido)\s*[:=]?\s*([A-Za-zÀ-ÿ\s.]+?)(?:\n|CNPJ|CPF)",
            0.9,
        ),
        Rule::new(
            "razao_social",
            r"(?i)(?:razão social|empresa)\s*[:=]?\s*([A-Za-zÀ-ÿ\s.]+?)(?:\n|CNPJ)",
            0.8,
        ),
    ];

    pub static ref PAYER_NAME_RULES: [Rule; 1] = [
        Rule::new(
            "pagador",
            r"(?i)(?:pagador|sacado|cliente)\s*[:=]?\s*([A-Za-zÀ-ÿ\s.]+?)(?:\n|CNPJ|CPF)",
            0.9,
        ),
    ];
}

/// Keywords near a date that mark it as the due date.
pub const DUE_DATE_KEYWORDS: [&str; 4] = ["vencimento", "venc", "pagar até", "data limite"];

/// Keywords near a date that mark it as the issue date.
pub const ISSUE_DATE_KEYWORDS: [&str; 3] = ["emissão", "emitido", "data de"];
