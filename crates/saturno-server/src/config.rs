//! Server Configuration
//!
//! Loaded from environment variables (after `.env`). Payment credentials are
//! read separately by `saturno-payments` so a missing token only disables
//! checkout.

use std::env;

use saturno_stats::AggregatorConfig;

/// Host process configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Aggregator recompute attempts on write conflict
    pub stats_max_attempts: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            stats_max_attempts: AggregatorConfig::default().max_attempts,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = env::var("BIND_ADDR").unwrap_or(defaults.bind_addr);

        let stats_max_attempts = match env::var("STATS_MAX_ATTEMPTS") {
            Ok(raw) => parse_attempts(&raw)?,
            Err(_) => defaults.stats_max_attempts,
        };

        Ok(Self {
            bind_addr,
            stats_max_attempts,
        })
    }

    pub fn aggregator(&self) -> AggregatorConfig {
        AggregatorConfig {
            max_attempts: self.stats_max_attempts,
        }
    }
}

fn parse_attempts(raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ConfigError::InvalidValue("STATS_MAX_ATTEMPTS")),
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
