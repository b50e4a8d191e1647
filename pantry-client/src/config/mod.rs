use std::path::PathBuf;

use client_core::ApiError;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    /// Backend origin. Override with `APP_API__BASE_URL`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout applied on the HTTP client.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Tokens expiring within this window are refreshed proactively.
    #[serde(default = "default_refresh_horizon_secs")]
    pub refresh_horizon_secs: i64,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageSettings {
    /// Durable token file. Tokens stay in memory only when unset.
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_refresh_horizon_secs() -> i64 {
    300
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            refresh_horizon_secs: default_refresh_horizon_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            storage: StorageSettings::default(),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ApiError> {
    client_core::config::load()
}
