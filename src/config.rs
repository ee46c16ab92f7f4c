//! Runtime settings: defaults, then `WAREHOUSE_*` environment overrides, then
//! validation.

use std::env;

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// Capacity of every actor's request channel.
    pub actor_buffer_size: usize,
    /// How many products the "most withdrawn" projection keeps.
    pub top_withdrawn_limit: usize,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self {
            actor_buffer_size: 32,
            top_withdrawn_limit: 5,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl WarehouseConfig {
    /// Defaults overlaid with the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(read_env)
    }

    /// Same as [`Self::load`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(value) = lookup("WAREHOUSE_ACTOR_BUFFER") {
            self.actor_buffer_size = parse_usize("WAREHOUSE_ACTOR_BUFFER", &value)?;
        }
        if let Some(value) = lookup("WAREHOUSE_TOP_WITHDRAWN_LIMIT") {
            self.top_withdrawn_limit = parse_usize("WAREHOUSE_TOP_WITHDRAWN_LIMIT", &value)?;
        }
        if let Some(value) = lookup("WAREHOUSE_LOG_LEVEL") {
            self.logging.level = value.trim().to_ascii_lowercase();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actor_buffer_size == 0 {
            return Err(ConfigError::Validation(
                "actor_buffer_size must be greater than zero".to_string(),
            ));
        }
        if self.top_withdrawn_limit == 0 {
            return Err(ConfigError::Validation(
                "top_withdrawn_limit must be greater than zero".to_string(),
            ));
        }
        validate_logging(&self.logging)
    }
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    match logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}
