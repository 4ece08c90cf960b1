//! Configuration loading and validation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::SampleSize;
use crate::parse_duration;
use crate::storage::StorageConfig;
use crate::strategy::ClassifierConfig;

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

/// Statistics and classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Rolling window for standalone player statistics
    #[serde(default = "default_player_window")]
    pub player_window: usize,

    /// League thermometer sample per league
    #[serde(default)]
    pub thermometer_sample: SampleSize,

    /// Veto signals in leagues with a low scoring profile
    #[serde(default)]
    pub league_guard: bool,
}

fn default_player_window() -> usize {
    crate::calculate::DEFAULT_PLAYER_WINDOW
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            player_window: default_player_window(),
            thermometer_sample: SampleSize::default(),
            league_guard: false,
        }
    }
}

impl EngineConfig {
    pub fn classifier(&self) -> ClassifierConfig {
        ClassifierConfig {
            league_guard: self.league_guard,
        }
    }
}

/// Alert gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_alerts_enabled")]
    pub enabled: bool,

    /// Minimum confidence (0 to 100) that may notify
    #[serde(default = "default_min_confidence")]
    pub min_confidence: u8,

    /// Suppression window per match and strategy, e.g. "120m"
    #[serde(default = "default_alert_ttl")]
    pub ttl: String,
}

fn default_alerts_enabled() -> bool {
    true
}

fn default_min_confidence() -> u8 {
    crate::alerts::DEFAULT_MIN_CONFIDENCE
}

fn default_alert_ttl() -> String {
    format!("{}m", crate::alerts::DEFAULT_ALERT_TTL_MINUTES)
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            enabled: default_alerts_enabled(),
            min_confidence: default_min_confidence(),
            ttl: default_alert_ttl(),
        }
    }
}

impl AlertsConfig {
    pub fn ttl_duration(&self) -> Option<Duration> {
        parse_duration(&self.ttl)
    }
}

/// Live scan settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// How often the payload files are re-read, e.g. "10s"
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,

    /// History payload, relative to the data directory
    #[serde(default = "default_history_file")]
    pub history_file: String,

    /// Live feed payload, relative to the data directory
    #[serde(default = "default_live_file")]
    pub live_file: String,
}

fn default_refresh_interval() -> String {
    "10s".to_string()
}

fn default_history_file() -> String {
    "history.json".to_string()
}

fn default_live_file() -> String {
    "live.json".to_string()
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            history_file: default_history_file(),
            live_file: default_live_file(),
        }
    }
}

impl ScanConfig {
    pub fn refresh_duration(&self) -> Option<Duration> {
        parse_duration(&self.refresh_interval)
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
    pub engine: EngineConfig,

    #[serde(default)]
    pub alerts: AlertsConfig,

    #[serde(default)]
    pub scan: ScanConfig,
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
            engine: EngineConfig::default(),
            alerts: AlertsConfig::default(),
            scan: ScanConfig::default(),
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

    /// Load from `path` when it exists, otherwise use the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.player_window == 0 {
            return Err(ConfigError::ValidationError(
                "Player window must be greater than 0".to_string(),
            ));
        }

        if self.alerts.min_confidence > 100 {
            return Err(ConfigError::ValidationError(format!(
                "Alert min_confidence must be at most 100, got {}",
                self.alerts.min_confidence
            )));
        }

        match self.alerts.ttl_duration() {
            Some(ttl) if !ttl.is_zero() => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid alert ttl: {:?}",
                    self.alerts.ttl
                )))
            }
        }

        match self.scan.refresh_duration() {
            Some(interval) if !interval.is_zero() => {}
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid scan refresh_interval: {:?}",
                    self.scan.refresh_interval
                )))
            }
        }

        Ok(())
    }

    pub fn storage(&self) -> StorageConfig {
        StorageConfig::new(self.data_dir.clone())
            .with_files(&self.scan.history_file, &self.scan.live_file)
    }
}
