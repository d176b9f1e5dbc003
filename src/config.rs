// src/config.rs

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_STORE_FILE: &str = "capacity_tracker_db_v1.json";

/// Environment-driven configuration, read from `CAPTRACK_*` variables after
/// dotenv has run. Every field has a working default so a bare checkout
/// starts up.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Shared password for the management and team dashboards.
    #[serde(default = "default_admin_password")]
    pub admin_password: String,
    /// Gates settings access and password reveal.
    #[serde(default = "default_it_master_password")]
    pub it_master_password: String,
}

fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_FILE)
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_it_master_password() -> String {
    "itpass123".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            admin_password: default_admin_password(),
            it_master_password: default_it_master_password(),
        }
    }
}

pub fn load() -> Result<AppConfig> {
    envy::prefixed("CAPTRACK_")
        .from_env::<AppConfig>()
        .context("Reading CAPTRACK_* configuration from the environment")
}
