use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::{Coordinates, Unit};

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const PLACEHOLDER_KEY: &str = "YOUR_API_KEY_HERE";
const MIN_API_KEY_LEN: usize = 11;

/// Provider endpoints. Overridable for self-hosted proxies and tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub base_url: String,
    pub geo_url: String,
    pub icon_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            base_url: "https://api.openweathermap.org/data/2.5/".to_string(),
            geo_url: "https://api.openweathermap.org/geo/1.0/".to_string(),
            icon_url: crate::normalize::DEFAULT_ICON_BASE.to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_unit = "fahrenheit"
///
/// [home]
/// lat = 51.5
/// lon = -0.12
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,

    /// Unit used until the user picks one explicitly.
    pub default_unit: Option<Unit>,

    pub timeout_secs: u64,

    pub endpoints: Endpoints,

    /// Fixed position answered by the location command.
    pub home: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            default_unit: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            endpoints: Endpoints::default(),
            home: None,
        }
    }
}

/// A key is usable when it is not the placeholder and long enough to be real.
pub fn is_api_key_usable(key: &str) -> bool {
    let key = key.trim();
    key != PLACEHOLDER_KEY && key.len() >= MIN_API_KEY_LEN
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    /// `OPENWEATHER_API_KEY` overrides the stored key.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_from(&Self::config_file_path()?)?;

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                cfg.api_key = Some(key);
            }
        }

        Ok(cfg)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the API key, or an error with a hint when it is missing or unusable.
    pub fn api_key(&self) -> Result<&str> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            anyhow!(
                "No OpenWeatherMap API key configured.\n\
                 Hint: run `skycast configure` or set {API_KEY_ENV}. Get a free key at openweathermap.org/api"
            )
        })?;

        if !is_api_key_usable(key) {
            return Err(anyhow!(
                "The configured OpenWeatherMap API key does not look valid.\n\
                 Hint: run `skycast configure` and paste the key from your OpenWeatherMap account."
            ));
        }

        Ok(key.trim())
    }

    pub fn set_api_key(&mut self, key: String) {
        self.api_key = Some(key.trim().to_string());
    }
}
