//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::calculate::RANK_UP_SEARCH_CAP;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Tunables for the statistics views and the write path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    /// Upper bound on extra games tried by the rank-up search
    #[serde(default = "default_rank_up_search_cap")]
    pub rank_up_search_cap: u32,

    /// Events shown in the single banner view
    #[serde(default = "default_banner_event_limit")]
    pub banner_event_limit: usize,

    /// Events shown in the carousel view
    #[serde(default = "default_carousel_event_limit")]
    pub carousel_event_limit: usize,

    /// Games this many days old or older can no longer be deleted one by one
    #[serde(default = "default_delete_window_days")]
    pub delete_window_days: i64,
}

fn default_rank_up_search_cap() -> u32 {
    RANK_UP_SEARCH_CAP
}

fn default_banner_event_limit() -> usize {
    3
}

fn default_carousel_event_limit() -> usize {
    5
}

fn default_delete_window_days() -> i64 {
    30
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            rank_up_search_cap: default_rank_up_search_cap(),
            banner_event_limit: default_banner_event_limit(),
            carousel_event_limit: default_carousel_event_limit(),
            delete_window_days: default_delete_window_days(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub stats: StatsConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            stats: StatsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &PathBuf) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.stats.rank_up_search_cap == 0 {
            return Err(ConfigError::ValidationError(
                "Rank-up search cap must be greater than 0".to_string(),
            ));
        }

        if self.stats.banner_event_limit == 0 || self.stats.carousel_event_limit == 0 {
            return Err(ConfigError::ValidationError(
                "Event limits must be greater than 0".to_string(),
            ));
        }

        if self.stats.delete_window_days <= 0 {
            return Err(ConfigError::ValidationError(
                "Delete window must be at least one day".to_string(),
            ));
        }

        Ok(())
    }
}
