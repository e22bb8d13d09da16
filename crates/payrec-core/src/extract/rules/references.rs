//! Supplementary identifiers: digit line, nosso número and document number.
//!
//! These fields are optional and a miss is not reported.

use super::patterns::{
    first_accepted, Rule, DIGIT_LINE_RULES, DOCUMENT_NUMBER_RULES, INTERNAL_REFERENCE_RULES,
};

fn first_capture(rules: &[Rule], text: &str) -> Option<String> {
    first_accepted(rules, text, |_, caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|value| !value.is_empty())
}

/// Digit line as printed on a boleto, kept verbatim.
pub fn extract_digit_line(text: &str) -> Option<String> {
    first_capture(&DIGIT_LINE_RULES[..], text)
}

/// Bank-side reference (nosso número).
pub fn extract_internal_reference(text: &str) -> Option<String> {
    first_capture(&INTERNAL_REFERENCE_RULES[..], text)
}

/// Document or invoice number.
pub fn extract_document_number(text: &str) -> Option<String> {
    first_capture(&DOCUMENT_NUMBER_RULES[..], text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digit_line_requires_grouping() {
        let grouped = "23793.38128 60000.000003 00000.000401 1 84340000150000";
        assert_eq!(extract_digit_line(&format!("Linha: {}", grouped)), Some(grouped.to_string()));

        let flat = "23793381286000000000300000000401184340000150000";
        assert_eq!(extract_digit_line(flat), None);
    }

    #[test]
    fn test_internal_reference() {
        assert_eq!(
            extract_internal_reference("Nosso Número: 00123-4/5"),
            Some("00123-4/5".to_string())
        );
        assert_eq!(
            extract_internal_reference("N. Documento = 998877"),
            Some("998877".to_string())
        );
        assert_eq!(extract_internal_reference("sem referencia"), None);
    }

    #[test]
    fn test_document_number_rules_in_order() {
        assert_eq!(extract_document_number("NF 4567"), Some("4567".to_string()));
        assert_eq!(extract_document_number("Fatura: 2024001"), Some("2024001".to_string()));
        assert_eq!(extract_document_number("Ref: 77"), Some("77".to_string()));
        assert_eq!(extract_document_number("nada aqui"), None);
    }
}
