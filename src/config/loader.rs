//! Load form configuration from JSON or from the process environment.

use crate::config::types::{CustomClasses, FormConfig};
use crate::error::ConfigError;

pub const ENV_DEFAULT_TIMEZONE: &str = "FORM_DEFAULT_TIMEZONE";
pub const ENV_CUSTOM_CLASSES: &str = "FORM_CUSTOM_CLASSES";
pub const ENV_FORM_NAME_FIELD: &str = "FORM_NAME_FIELD";

impl FormConfig {
    pub fn from_json(s: &str) -> Result<FormConfig, ConfigError> {
        let config: FormConfig = serde_json::from_str(s)?;
        config.check()?;
        Ok(config)
    }

    /// Start from defaults and apply any `FORM_*` variables that are set.
    /// `FORM_CUSTOM_CLASSES` holds the custom class map as JSON.
    pub fn from_env() -> Result<FormConfig, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<FormConfig, ConfigError> {
        let mut config = FormConfig::default();
        if let Some(tz) = lookup(ENV_DEFAULT_TIMEZONE).filter(|s| !s.trim().is_empty()) {
            config.default_timezone = tz.trim().to_string();
        }
        if let Some(field) = lookup(ENV_FORM_NAME_FIELD).filter(|s| !s.trim().is_empty()) {
            config.form_name_field = field.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_CUSTOM_CLASSES).filter(|s| !s.trim().is_empty()) {
            let classes: CustomClasses = serde_json::from_str(&raw)
                .map_err(|e| ConfigError::Load(format!("{}: {}", ENV_CUSTOM_CLASSES, e)))?;
            config.custom_classes = classes;
        }
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.default_timezone.parse::<chrono_tz::Tz>().is_err() {
            return Err(ConfigError::Validation(format!(
                "unknown default timezone: {}",
                self.default_timezone
            )));
        }
        if self.form_name_field.trim().is_empty() {
            return Err(ConfigError::Validation("form_name_field must not be empty".into()));
        }
        Ok(())
    }
}
