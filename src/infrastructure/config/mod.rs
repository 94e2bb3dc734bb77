use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use tracing::debug;
use validator::Validate;

use crate::domain::error::{AppError, Result};
use crate::domain::rules::ValidationRules;

/// Environment variable prefix for rule overrides, e.g. `QRWIZARD_MAX_CSV_FILE_BYTES`
pub const ENV_PREFIX: &str = "QRWIZARD_";

pub struct ConfigService {
    figment: Figment,
}

impl ConfigService {
    /// Defaults, then the optional TOML file, then environment overrides
    pub fn new(config_file: Option<&Path>) -> Self {
        let mut figment = Figment::from(Serialized::defaults(ValidationRules::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        Self { figment }
    }

    pub fn from_figment(figment: Figment) -> Self {
        Self { figment }
    }

    pub fn load_rules(&self) -> Result<ValidationRules> {
        let rules: ValidationRules = self
            .figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load validation rules: {}", e)))?;

        rules
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid validation rules: {}", e)))?;

        debug!(?rules, "Loaded validation rules");
        Ok(rules)
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_toml(toml: &str) -> ConfigService {
        ConfigService::from_figment(
            Figment::from(Serialized::defaults(ValidationRules::default())).merge(Toml::string(toml)),
        )
    }

    #[test]
    fn test_defaults_load() {
        let rules = with_toml("").load_rules().unwrap();
        assert_eq!(rules, ValidationRules::default());
    }

    #[test]
    fn test_toml_overrides_single_field() {
        let rules = with_toml("barcode_max_dimension = 800").load_rules().unwrap();

        assert_eq!(rules.barcode_max_dimension, 800);
        assert_eq!(rules.barcode_min_dimension, 50);
    }

    #[test]
    fn test_invalid_override_is_config_error() {
        let err = with_toml("qr_min_dimension = 2000").load_rules().unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));

        let err = with_toml("type_match_threshold = \"high\"").load_rules().unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
