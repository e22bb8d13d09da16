//! Configuration for extraction and matching.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{PayrecError, Result};

/// Main configuration for the payrec pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PayrecConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Payable matching configuration.
    pub matching: MatchingConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum number of characters of source text kept on the record.
    pub max_raw_text_chars: usize,

    /// Maximum number of characters kept for payee/payer names.
    pub max_name_chars: usize,

    /// Characters inspected on each side of a date to decide its role.
    pub date_context_chars: usize,

    /// Smallest plausible amount.
    pub min_amount: Decimal,

    /// Largest plausible amount.
    pub max_amount: Decimal,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_raw_text_chars: 5000,
            max_name_chars: 100,
            date_context_chars: 50,
            min_amount: Decimal::new(1, 2),
            max_amount: Decimal::new(10_000_000, 0),
        }
    }
}

/// Payable matching configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Minimum score for an exact match.
    pub exact_threshold: u32,

    /// Minimum score for a partial match.
    pub partial_threshold: u32,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            exact_threshold: 70,
            partial_threshold: 40,
        }
    }
}

impl PayrecConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings that would make extraction or matching meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.min_amount > self.extraction.max_amount {
            return Err(PayrecError::Config(format!(
                "min_amount ({}) exceeds max_amount ({})",
                self.extraction.min_amount, self.extraction.max_amount
            )));
        }
        if self.matching.partial_threshold > self.matching.exact_threshold {
            return Err(PayrecError::Config(format!(
                "partial_threshold ({}) exceeds exact_threshold ({})",
                self.matching.partial_threshold, self.matching.exact_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PayrecConfig =
            serde_json::from_str(r#"{"matching": {"exact_threshold": 80}}"#).unwrap();
        assert_eq!(config.matching.exact_threshold, 80);
        assert_eq!(config.matching.partial_threshold, 40);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = PayrecConfig::default();
        config.extraction.max_name_chars = 60;
        config.save(&path).unwrap();

        assert_eq!(PayrecConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = PayrecConfig::default();
        config.matching.partial_threshold = 90;
        assert!(matches!(config.validate(), Err(PayrecError::Config(_))));
    }
}
