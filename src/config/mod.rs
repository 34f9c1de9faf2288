//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides the configured API key.
pub const API_KEY_ENV: &str = "RIOT_API_KEY";

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

/// Riot API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiotConfig {
    /// API key; the RIOT_API_KEY environment variable takes precedence
    #[serde(default)]
    pub api_key: String,

    /// Platform routing value for league endpoints (e.g. "na1")
    #[serde(default = "default_platform")]
    pub platform: String,

    /// Regional routing value for match endpoints (e.g. "americas")
    #[serde(default = "default_region")]
    pub region: String,

    /// Delay between requests in milliseconds
    #[serde(default = "default_request_delay")]
    pub request_delay_ms: u64,

    /// Matches requested per player
    #[serde(default = "default_matches_per_player")]
    pub matches_per_player: u32,

    /// Timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Retries after a rate-limit response
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_platform() -> String {
    "na1".to_string()
}

fn default_region() -> String {
    "americas".to_string()
}

fn default_request_delay() -> u64 {
    850
}

fn default_matches_per_player() -> u32 {
    20
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

impl Default for RiotConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            platform: default_platform(),
            region: default_region(),
            request_delay_ms: default_request_delay(),
            matches_per_player: default_matches_per_player(),
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

impl RiotConfig {
    /// API key from the environment, falling back to the config file.
    pub fn resolved_api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| Some(self.api_key.clone()).filter(|k| !k.trim().is_empty()))
    }
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

/// Query defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Rows returned when a request does not specify `top`/`search`
    #[serde(default = "default_top")]
    pub default_top: usize,

    /// Upper bound on `top`/`search`
    #[serde(default = "default_max_top")]
    pub max_top: usize,
}

fn default_top() -> usize {
    10
}

fn default_max_top() -> usize {
    100
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_top: default_top(),
            max_top: default_max_top(),
        }
    }
}

impl AnalysisConfig {
    /// Requested row count, defaulted and clamped to 1..=max_top.
    pub fn clamp_top(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_top)
            .clamp(1, self.max_top)
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
    pub riot: RiotConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
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
            riot: RiotConfig::default(),
            server: ServerConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise use defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.riot.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Riot timeout must be greater than 0".to_string(),
            ));
        }

        if self.riot.matches_per_player == 0 {
            return Err(ConfigError::ValidationError(
                "matches_per_player must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if self.analysis.default_top == 0 || self.analysis.default_top > self.analysis.max_top {
            return Err(ConfigError::ValidationError(
                "default_top must be between 1 and max_top".to_string(),
            ));
        }

        Ok(())
    }
}
