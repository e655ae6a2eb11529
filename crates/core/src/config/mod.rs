//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (COURSEFIND_*)
//! 2. TOML config file (if COURSEFIND_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (COURSEFIND_*)
/// 2. TOML config file (if COURSEFIND_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the course-search backend.
    ///
    /// Set via COURSEFIND_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path to the SQLite store holding cached results and location.
    ///
    /// Set via COURSEFIND_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Maximum bytes the store may hold; 0 disables the limit.
    ///
    /// Set via COURSEFIND_STORE_QUOTA_BYTES environment variable.
    #[serde(default = "default_store_quota_bytes")]
    pub store_quota_bytes: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via COURSEFIND_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via COURSEFIND_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Fixed latitude used when the platform has no geolocation service.
    #[serde(default)]
    pub latitude: Option<f64>,

    /// Fixed longitude used when the platform has no geolocation service.
    #[serde(default)]
    pub longitude: Option<f64>,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5005/".into()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./coursefind-cache.sqlite")
}

fn default_store_quota_bytes() -> u64 {
    5_242_880 // 5MB
}

fn default_user_agent() -> String {
    "coursefind/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            db_path: default_db_path(),
            store_quota_bytes: default_store_quota_bytes(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            latitude: None,
            longitude: None,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Configured fixed position, if both coordinates are set.
    pub fn fixed_position(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("COURSEFIND_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("COURSEFIND_")
                .ignore(&["config_file"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
