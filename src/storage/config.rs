//! Configuration handling for Tombola
//!
//! Configuration is read from `--config <path>`, then `./tombola.toml`,
//! then `~/.config/tombola/config.toml` (global). Without any file the
//! built-in event setup is used: two pools of 100 numbers, yellow and red.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{CategorySpec, SessionOptions};

/// File name looked up in the working directory
pub const CONFIG_FILE: &str = "tombola.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Draw configuration: categories plus timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Milliseconds between preview refreshes while spinning
    pub tick_ms: u64,

    /// Fixed seed for reproducible draws
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Preview refreshes shown per draw in headless mode
    pub spin_ticks: u32,

    /// Categories in display order
    #[serde(rename = "category")]
    pub categories: Vec<CategorySpec>,
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            seed: None,
            spin_ticks: 10,
            categories: vec![
                CategorySpec::new("yellow", 100).with_color("yellow"),
                CategorySpec::new("red", 100).with_color("red"),
            ],
        }
    }
}

impl DrawConfig {
    /// Parses a TOML document
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let config: Self =
            toml::from_str(content).map_err(|e| SettingsError::Parse(e.to_string()))?;
        if config.tick_ms == 0 {
            return Err(SettingsError::Invalid("tick_ms must be at least 1".to_string()));
        }
        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Session options, with an optional seed overriding the configured one
    pub fn session_options(&self, seed: Option<u64>) -> SessionOptions {
        SessionOptions {
            tick_interval: self.tick_interval(),
            seed: seed.or(self.seed),
        }
    }
}

/// Loaded configuration and where it came from
#[derive(Debug, Clone)]
pub struct Config {
    pub draw: DrawConfig,
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads configuration, preferring an explicit path
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            return Self::load_from(path);
        }

        let local = PathBuf::from(CONFIG_FILE);
        if local.is_file() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_dir().map(|d| d.join("config.toml")) {
            if global.is_file() {
                return Self::load_from(&global);
            }
        }

        Ok(Self {
            draw: DrawConfig::default(),
            source: None,
        })
    }

    /// Loads configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let draw = DrawConfig::from_toml(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        Ok(Self {
            draw,
            source: Some(path.to_path_buf()),
        })
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "tombola", "tombola").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Writes the default configuration; returns false if the file existed
    /// and `force` was not given
    pub fn write_default(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            return Ok(false);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(&DrawConfig::default())
            .context("Failed to serialize default config")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(true)
    }
}
