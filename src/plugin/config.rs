//! Registry configuration.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Registry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Label attached to every log event emitted by the registry
    pub label: String,
    /// Maximum number of registered plugins (unlimited if `None`)
    pub max_plugins: Option<usize>,
}

impl RegistryConfig {
    /// Create default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the log label.
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = label.to_string();
        self
    }

    /// Cap the number of registered plugins.
    pub fn with_max_plugins(mut self, max: usize) -> Self {
        self.max_plugins = Some(max);
        self
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config for values the registry cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.max_plugins == Some(0) {
            return Err(Error::InvalidConfig(
                "max_plugins must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            label: "plugins".to_string(),
            max_plugins: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RegistryConfig::default();
        assert_eq!(config.label, "plugins");
        assert_eq!(config.max_plugins, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = RegistryConfig::new().with_label("edge").with_max_plugins(8);
        assert_eq!(config.label, "edge");
        assert_eq!(config.max_plugins, Some(8));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({ "max_plugins": 3 }).to_string();
        let config = RegistryConfig::from_json(&json).unwrap();
        assert_eq!(config.label, "plugins");
        assert_eq!(config.max_plugins, Some(3));
    }

    #[test]
    fn test_from_json_rejects_zero_capacity() {
        let result = RegistryConfig::from_json(r#"{"max_plugins": 0}"#);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_from_json_malformed() {
        let result = RegistryConfig::from_json("not json");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
