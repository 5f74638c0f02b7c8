//! Configuration module for craftwatch
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`CRAFTWATCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use craftwatch::config::CraftwatchConfig;
//!
//! let config = CraftwatchConfig::default();
//! assert_eq!(config.backend.url, "http://localhost:5000");
//!
//! let toml = r#"
//! [polling]
//! calendar_seconds = 5
//! "#;
//! let config: CraftwatchConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.polling.calendar_seconds, 5);
//! ```

pub mod backend;
pub mod error;
pub mod logging;
pub mod polling;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};
pub use polling::PollingConfig;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Unified configuration for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CraftwatchConfig {
    /// Backend location and request timeout
    pub backend: BackendConfig,
    /// Refresh interval per data source
    pub polling: PollingConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl CraftwatchConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `CRAFTWATCH_*` overrides read through `lookup`.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("CRAFTWATCH_URL") {
            self.backend.url = url;
        }
        if let Some(timeout) = lookup("CRAFTWATCH_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.backend.request_timeout_seconds = t;
            }
        }

        if let Some(level) = lookup("CRAFTWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CRAFTWATCH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.url.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "backend.url".to_string(),
                message: "URL cannot be empty".to_string(),
            });
        }
        if let Err(e) = crate::client::parse_base_url(&self.backend.url) {
            return Err(ConfigError::Validation {
                field: "backend.url".to_string(),
                message: e.to_string(),
            });
        }

        if self.backend.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "backend.request_timeout_seconds".to_string(),
                message: "timeout must be non-zero".to_string(),
            });
        }

        for (name, seconds) in self.polling.entries() {
            if seconds == 0 {
                return Err(ConfigError::Validation {
                    field: format!("polling.{}", name),
                    message: "interval must be non-zero".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::Path;

    #[test]
    fn test_config_defaults() {
        let config = CraftwatchConfig::default();
        assert_eq!(config.backend.url, "http://localhost:5000");
        assert_eq!(config.backend.request_timeout_seconds, 10);
        assert_eq!(config.polling.health_seconds, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_minimal_toml() {
        let toml = r#"
        [backend]
        url = "http://mc.example.com:8080"
        "#;

        let config: CraftwatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.backend.url, "http://mc.example.com:8080");
        assert_eq!(config.backend.request_timeout_seconds, 10); // Default
    }

    #[test]
    fn test_config_parse_example_file() {
        let toml = include_str!("../../craftwatch.example.toml");
        let config: CraftwatchConfig = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[polling]\nhealth_seconds = 15").unwrap();

        let config = CraftwatchConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.polling.health_seconds, 15);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[polling\nhealth_seconds = ").unwrap();

        let result = CraftwatchConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = CraftwatchConfig::load(Some(Path::new("/nonexistent/craftwatch.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = CraftwatchConfig::load(None).unwrap();
        assert_eq!(config.polling.selection_seconds, 5);
    }

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_config_env_override_url() {
        let config = CraftwatchConfig::default()
            .with_overrides_from(vars(&[("CRAFTWATCH_URL", "http://10.0.0.5:5000")]));

        assert_eq!(config.backend.url, "http://10.0.0.5:5000");
    }

    #[test]
    fn test_config_env_override_timeout() {
        let config = CraftwatchConfig::default()
            .with_overrides_from(vars(&[("CRAFTWATCH_TIMEOUT", "3")]));
        assert_eq!(config.backend.request_timeout_seconds, 3);

        // Invalid value keeps default, not crash
        let config = CraftwatchConfig::default()
            .with_overrides_from(vars(&[("CRAFTWATCH_TIMEOUT", "soon")]));
        assert_eq!(config.backend.request_timeout_seconds, 10);
    }

    #[test]
    fn test_config_env_override_log_format() {
        let config = CraftwatchConfig::default()
            .with_overrides_from(vars(&[("CRAFTWATCH_LOG_FORMAT", "json")]));
        assert_eq!(config.logging.format, LogFormat::Json);

        let config = CraftwatchConfig::default()
            .with_overrides_from(vars(&[("CRAFTWATCH_LOG_FORMAT", "xml")]));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_absent_overrides_keep_file_values() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            temp.path(),
            "[backend]\nurl = \"http://file.example:5000\"\nrequest_timeout_seconds = 4",
        )
        .unwrap();

        let config = CraftwatchConfig::load(Some(temp.path()))
            .unwrap()
            .with_overrides_from(vars(&[("CRAFTWATCH_LOG_LEVEL", "debug")]));
        assert_eq!(config.backend.url, "http://file.example:5000");
        assert_eq!(config.backend.request_timeout_seconds, 4);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_config_validation_empty_url() {
        let mut config = CraftwatchConfig::default();
        config.backend.url = "  ".to_string();

        let result = config.validate();
        assert!(matches!(
            result,
            Err(ConfigError::Validation { ref field, .. }) if field == "backend.url"
        ));
    }

    #[test]
    fn test_config_validation_bad_scheme() {
        let mut config = CraftwatchConfig::default();
        config.backend.url = "ftp://localhost".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "backend.url"
        ));
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let mut config = CraftwatchConfig::default();
        config.backend.request_timeout_seconds = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field.contains("timeout")
        ));
    }

    #[test]
    fn test_config_validation_zero_interval() {
        let mut config = CraftwatchConfig::default();
        config.polling.health_seconds = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "polling.health_seconds"
        ));
    }
}
