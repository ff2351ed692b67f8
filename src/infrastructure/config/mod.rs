// ============================================================
// APPLICATION CONFIG
// ============================================================
// Defaults <- optional TOML file <- DATASWEEPER_* environment

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::error::{AppError, Result};

pub const DEFAULT_CONFIG_FILE: &str = "datasweeper.toml";
pub const ENV_PREFIX: &str = "DATASWEEPER_";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    /// Interface the HTTP server binds to
    #[validate(length(min = 1))]
    pub host: String,

    #[validate(range(min = 1))]
    pub port: u16,

    /// Rows shown by the preview endpoint
    #[validate(range(min = 1, max = 1000))]
    pub preview_rows: usize,

    /// Activity log entries kept in memory
    #[validate(range(min = 1))]
    pub log_capacity: usize,

    /// Largest accepted upload body
    #[validate(range(min = 1))]
    pub max_upload_bytes: usize,

    /// `tracing_subscriber` env-filter directive
    #[validate(length(min = 1))]
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            preview_rows: 5,
            log_capacity: 100,
            max_upload_bytes: 50 * 1024 * 1024,
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from `datasweeper.toml` (or `$DATASWEEPER_CONFIG`) and the environment
    pub fn load() -> Result<Self> {
        let path = std::env::var(format!("{}CONFIG", ENV_PREFIX))
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX));

        Self::from_figment(figment)
    }

    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment
            .extract()
            .map_err(|e| AppError::ConfigError(format!("Failed to load config: {}", e)))?;

        config
            .validate()
            .map_err(|e| AppError::ConfigError(format!("Invalid config: {}", e)))?;

        Ok(config)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
