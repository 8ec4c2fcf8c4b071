use std::{env, io::ErrorKind, path::Path};

use serde::Deserialize;

/// Environment variable holding the path of the TOML configuration file
pub const CONFIG_PATH_VAR: &str = "SPORTS_CLUB_CONFIG";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub pricing: PricingConfig,
    /// Amount credited to a member's balance each time they work
    pub salary: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct PricingConfig {
    /// Base price of a standard tier membership
    pub standard_membership: f64,
    /// Base price of a full tier membership
    pub full_membership: f64,
    /// Price of every personal session after the free one, for full tier members
    pub full_tier_personal_rate: f64,
    /// Apply the combined membership discount to session registrations as well
    pub discount_session_registrations: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            standard_membership: 40.0,
            full_membership: 60.0,
            full_tier_personal_rate: 20.0,
            discount_session_registrations: false,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pricing: PricingConfig::default(),
            salary: 50.0,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Load the file named by [`CONFIG_PATH_VAR`]
    ///
    /// Falls back to the defaults when the variable is unset or the file does not exist.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_optional_path(env::var(CONFIG_PATH_VAR).ok())
    }

    fn from_optional_path(path: Option<String>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            log::debug!("{CONFIG_PATH_VAR} is not set, using defaults");
            return Ok(Self::default());
        };
        match Self::from_file(&path) {
            Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => {
                log::warn!("config file {path} not found, using defaults");
                Ok(Self::default())
            }
            res => res,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let prices = [
            ("pricing.standard_membership", self.pricing.standard_membership),
            ("pricing.full_membership", self.pricing.full_membership),
            ("pricing.full_tier_personal_rate", self.pricing.full_tier_personal_rate),
            ("salary", self.salary),
        ];
        match prices.iter().find(|(_, value)| !value.is_finite() || *value < 0.0) {
            Some((key, value)) => Err(ConfigError::Invalid(format!(
                "{key} must be a non-negative number, got {value}"
            ))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unable to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use speculoos::prelude::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let res = EngineConfig::from_toml_str(
            r#"
            [pricing]
            full_membership = 75.0
            "#,
        );

        assert_that!(res).is_ok().matches(|config| {
            config.pricing.full_membership == 75.0
                && config.pricing.standard_membership == 40.0
                && !config.pricing.discount_session_registrations
                && config.salary == 50.0
        });
    }

    #[test]
    fn test_negative_price_rejected() {
        let res = EngineConfig::from_toml_str("salary = -1.0");

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_garbage_rejected() {
        let res = EngineConfig::from_toml_str("pricing = 12");

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_optional_path_unset() {
        let res = EngineConfig::from_optional_path(None);

        assert_that!(res).is_ok().is_equal_to(EngineConfig::default());
    }

    #[test]
    fn test_optional_path_missing_file() {
        let res =
            EngineConfig::from_optional_path(Some("/nonexistent/sports-club.toml".to_string()));

        assert_that!(res).is_ok().is_equal_to(EngineConfig::default());
    }

    #[test]
    fn test_optional_path_invalid_file() {
        let path = env::temp_dir().join(format!("sports-club-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "salary = -5.0").unwrap();

        let res = EngineConfig::from_optional_path(Some(path.display().to_string()));

        std::fs::remove_file(&path).unwrap();
        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, ConfigError::Invalid(_)));
    }

    /// Only test touching the process environment
    #[test]
    fn test_from_env() {
        let path = env::temp_dir().join(format!("sports-club-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(&path, "salary = 80.0").unwrap();

        env::set_var(CONFIG_PATH_VAR, &path);
        let res = EngineConfig::from_env();
        env::remove_var(CONFIG_PATH_VAR);
        let unset = EngineConfig::from_env();

        std::fs::remove_file(&path).unwrap();
        assert_that!(res).is_ok().matches(|config| config.salary == 80.0);
        assert_that!(unset).is_ok().is_equal_to(EngineConfig::default());
    }

    #[test]
    fn test_missing_file() {
        let res = EngineConfig::from_file("/nonexistent/sports-club.toml");

        assert_that!(res)
            .is_err()
            .matches(|err| matches!(err, ConfigError::Io(_)));
    }
}
