//! Configuration types and builders.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Configuration for the SQL generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub model: String,
    /// Low temperature keeps SQL generation deterministic.
    pub temperature: f32,
    pub max_output_tokens: u32,
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash-exp".into(),
            temperature: 0.1,
            max_output_tokens: 500,
            api_key: None,
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub max_question_length: usize,
    /// Row limit the prompt asks the model to apply by default.
    pub default_row_limit: u32,
    /// Row limit the prompt asks the model never to exceed.
    pub max_row_limit: u32,
    pub query_timeout: Duration,
    pub schema_cache_ttl: Duration,
    pub generator: GeneratorConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_question_length: 500,
            default_row_limit: 100,
            max_row_limit: 1000,
            query_timeout: Duration::from_secs(30),
            schema_cache_ttl: Duration::from_secs(300),
            generator: GeneratorConfig::default(),
        }
    }
}

impl ServiceConfig {
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }
}

/// Builder for ServiceConfig with fluent API.
#[derive(Default)]
pub struct ServiceConfigBuilder {
    config: ServiceConfig,
}

impl ServiceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_question_length(mut self, length: usize) -> Self {
        self.config.max_question_length = length;
        self
    }

    pub fn default_row_limit(mut self, limit: u32) -> Self {
        self.config.default_row_limit = limit;
        self
    }

    pub fn max_row_limit(mut self, limit: u32) -> Self {
        self.config.max_row_limit = limit;
        self
    }

    pub fn query_timeout(mut self, timeout: Duration) -> Self {
        self.config.query_timeout = timeout;
        self
    }

    pub fn schema_cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.schema_cache_ttl = ttl;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generator.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.generator.temperature = temperature;
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.config.generator.max_output_tokens = tokens;
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.generator.api_key = Some(api_key.into());
        self
    }

    /// Overlay settings from environment variables.
    pub fn from_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(api_key) = env::var("GEMINI_API_KEY") {
            self.config.generator.api_key = Some(api_key);
        }

        if let Ok(model) = env::var("GEMINI_MODEL") {
            self.config.generator.model = model;
        }

        if let Ok(ttl) = env::var("SCHEMA_CACHE_TTL_SECS") {
            let secs = ttl.parse().map_err(|_| ConfigError::InvalidValue {
                field: "SCHEMA_CACHE_TTL_SECS".into(),
                message: "Invalid number of seconds".into(),
            })?;
            self.config.schema_cache_ttl = Duration::from_secs(secs);
        }

        if let Ok(timeout) = env::var("QUERY_TIMEOUT_SECS") {
            let secs = timeout.parse().map_err(|_| ConfigError::InvalidValue {
                field: "QUERY_TIMEOUT_SECS".into(),
                message: "Invalid number of seconds".into(),
            })?;
            self.config.query_timeout = Duration::from_secs(secs);
        }

        if let Ok(limit) = env::var("DEFAULT_ROW_LIMIT") {
            self.config.default_row_limit = limit.parse().map_err(|_| {
                ConfigError::InvalidValue {
                    field: "DEFAULT_ROW_LIMIT".into(),
                    message: "Invalid row limit".into(),
                }
            })?;
        }

        Ok(self)
    }

    pub fn build(self) -> Result<ServiceConfig, ConfigError> {
        self.validate()?;
        Ok(self.config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.config.max_question_length == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_question_length".into(),
                message: "Must be greater than 0".into(),
            });
        }
        if self.config.default_row_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_row_limit".into(),
                message: "Must be greater than 0".into(),
            });
        }
        if self.config.default_row_limit > self.config.max_row_limit {
            return Err(ConfigError::InvalidValue {
                field: "default_row_limit".into(),
                message: "Must not exceed max_row_limit".into(),
            });
        }
        if !(0.0..=2.0).contains(&self.config.generator.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "temperature".into(),
                message: "Must be between 0.0 and 2.0".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.max_question_length, 500);
        assert_eq!(config.default_row_limit, 100);
        assert_eq!(config.max_row_limit, 1000);
        assert_eq!(config.schema_cache_ttl, Duration::from_secs(300));
        assert_eq!(config.generator.model, "gemini-2.0-flash-exp");
        assert!(config.generator.api_key.is_none());
    }

    #[test]
    fn test_builder() {
        let config = ServiceConfig::builder()
            .api_key("test-key")
            .model("gemini-1.5-pro")
            .default_row_limit(50)
            .schema_cache_ttl(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.generator.api_key.as_deref(), Some("test-key"));
        assert_eq!(config.generator.model, "gemini-1.5-pro");
        assert_eq!(config.default_row_limit, 50);
    }

    #[test]
    fn test_validation_rejects_zero_question_length() {
        let result = ServiceConfig::builder().max_question_length(0).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field, .. }) if field == "max_question_length"
        ));
    }

    #[test]
    fn test_validation_rejects_limit_above_max() {
        let result = ServiceConfig::builder()
            .default_row_limit(2000)
            .max_row_limit(1000)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_rejects_out_of_range_temperature() {
        let result = ServiceConfig::builder().temperature(3.5).build();
        assert!(result.is_err());
    }
}
