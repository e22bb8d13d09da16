//! Payee and payer name extraction.

use super::patterns::{first_accepted, Rule, PAYEE_NAME_RULES, PAYER_NAME_RULES};

/// Names found next to party labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyNames {
    /// Beneficiário / cedente / favorecido.
    pub payee: Option<String>,
    /// Pagador / sacado / cliente.
    pub payer: Option<String>,
}

/// Extract payee and payer names, each capped at `max_chars` characters.
///
/// Original casing is kept.
pub fn extract_party_names(text: &str, max_chars: usize) -> PartyNames {
    PartyNames {
        payee: extract_name(&PAYEE_NAME_RULES[..], text, max_chars),
        payer: extract_name(&PAYER_NAME_RULES[..], text, max_chars),
    }
}

fn extract_name(rules: &[Rule], text: &str, max_chars: usize) -> Option<String> {
    first_accepted(rules, text, |_, caps| caps.get(1).map(|m| m.as_str()))
        .map(|raw| truncate_chars(raw.trim(), max_chars).trim_end().to_string())
        .filter(|name| !name.is_empty())
}

/// Longest prefix of `s` with at most `max_chars` characters.
pub(crate) fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_party_names() {
        let text = "Beneficiário: Fornecedor ABC Ltda\n\
                    CNPJ: 12.345.678/0001-90\n\
                    Pagador: Minha Empresa\n\
                    CNPJ: 11.222.333/0001-44\n";

        let names = extract_party_names(text, 100);
        assert_eq!(names.payee.as_deref(), Some("Fornecedor ABC Ltda"));
        assert_eq!(names.payer.as_deref(), Some("Minha Empresa"));
    }

    #[test]
    fn test_fallback_payee_rule() {
        let text = "Razão Social: Comercial Silva S.A.\nCNPJ 12.345.678/0001-90";
        let names = extract_party_names(text, 100);
        assert_eq!(names.payee.as_deref(), Some("Comercial Silva S.A."));
        assert_eq!(names.payer, None);
    }

    #[test]
    fn test_name_is_capped() {
        let long = "A".repeat(150);
        let text = format!("Cedente: {}\n", long);
        let names = extract_party_names(&text, 100);
        assert_eq!(names.payee.unwrap().chars().count(), 100);
    }

    #[test]
    fn test_truncate_chars_multibyte() {
        assert_eq!(truncate_chars("çãéí", 2), "çã");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
