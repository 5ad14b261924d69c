// Configuration - health-screening.toml plus environment overrides
// Every section has defaults, so a missing file is not an error

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "HEALTH_SCREENING_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "health-screening.toml";

/// How forms obtain their prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMode {
    /// Each form uses its own source (API, coin flip or average)
    #[default]
    Default,
    /// Every form calls the prediction API
    Remote,
    /// No network; API forms are scored with the bundled rules
    Local,
}

impl FromStr for PredictionMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(PredictionMode::Default),
            "remote" => Ok(PredictionMode::Remote),
            "local" | "offline" => Ok(PredictionMode::Local),
            other => Err(format!("unknown prediction mode: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub prediction: PredictionConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ============================================================================
// API CLIENT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the prediction API, without the /predict suffix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

// ============================================================================
// PREDICTION
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PredictionConfig {
    #[serde(default)]
    pub mode: PredictionMode,

    /// Fixed seed for the coin-flip forms; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

// ============================================================================
// SERVER
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_addr")]
    pub addr: String,
}

fn default_server_addr() -> String {
    "0.0.0.0:5000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
        }
    }
}

// ============================================================================
// LOGGING
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// EnvFilter directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Log file for the TUI; the terminal is busy drawing
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_filter() -> String {
    "health_screening=info,screening_server=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            file: None,
        }
    }
}

// ============================================================================
// LOADING
// ============================================================================

impl Config {
    /// Load from $HEALTH_SCREENING_CONFIG or ./health-screening.toml, then
    /// apply environment overrides
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&path).exists() {
            Self::from_file(&path)?
        } else {
            Config::default()
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// HEALTH_API_BASE, HEALTH_PREDICTION_MODE, HEALTH_SERVER_ADDR
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base) = lookup("HEALTH_API_BASE") {
            self.api.base_url = base;
        }
        if let Some(mode) = lookup("HEALTH_PREDICTION_MODE") {
            self.prediction.mode = mode.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(addr) = lookup("HEALTH_SERVER_ADDR") {
            self.server.addr = addr;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================
