//! Layered CLI configuration
//!
//! Priority: defaults, then the TOML config file, then `FILEHASH_`-prefixed
//! environment variables. The resolved `[hash]` table is the settings
//! snapshot handed to the core.

use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use filehash_core::Settings;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct AppConfig {
    /// Core hashing and dedupe settings
    #[serde(default)]
    pub hash: Settings,

    #[serde(default)]
    pub database: DatabaseConfig,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct DatabaseConfig {
    /// Digest database location; defaults to ./filehash.db
    pub path: Option<PathBuf>,
}

/// Configuration manager for the layered load
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Use the given config file, or environment/defaults only when `None`
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path }
    }

    /// Load configuration with layered priority: ENV > File > Defaults
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(path) = &self.config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed("FILEHASH_").split("__"));

        figment.extract().context("Failed to load configuration")
    }
}
