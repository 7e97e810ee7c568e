//! Main application configuration
//!
//! This module defines the primary configuration structures for the pulseball
//! ranking service, including environment variable loading, TOML files and validation.

use crate::config::rating::RatingConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Storage key the rankings table is persisted under
pub const DEFAULT_STORAGE_KEY: &str = "rankings";

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceSettings,
    pub storage: StorageSettings,
    pub rating: RatingConfig,
    pub render: RenderSettings,
}

/// Service-level settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Service name for logging
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Which storage provider backs the rankings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

/// Persistence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Directory for the file backend
    pub directory: PathBuf,
    /// Key the serialized rankings live under
    pub key: String,
}

/// HTML table output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Where to write the rendered table; nothing is written when unset
    pub output_path: Option<PathBuf>,
    /// Number of leading rows rendered with the highlight class
    pub highlight_top: usize,
    pub highlight_class: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            name: "pulseball".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            directory: PathBuf::from(".pulseball"),
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output_path: None,
            highlight_top: 3,
            highlight_class: "success".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML file; environment variables still override it
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.apply_env()?;
        validate_config(&config)?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        // Service settings
        if let Ok(name) = env::var("SERVICE_NAME") {
            self.service.name = name;
        }
        if let Ok(log_level) = env::var("LOG_LEVEL") {
            self.service.log_level = log_level;
        }

        // Storage settings
        if let Ok(backend) = env::var("STORAGE_BACKEND") {
            self.storage.backend = match backend.to_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "file" => StorageBackend::File,
                _ => return Err(anyhow!("Invalid STORAGE_BACKEND value: {}", backend)),
            };
        }
        if let Ok(dir) = env::var("STORAGE_DIR") {
            self.storage.directory = PathBuf::from(dir);
        }
        if let Ok(key) = env::var("STORAGE_KEY") {
            self.storage.key = key;
        }

        // Rating settings
        if let Ok(advantage) = env::var("HOME_ADVANTAGE") {
            self.rating.home_advantage = advantage
                .parse()
                .map_err(|_| anyhow!("Invalid HOME_ADVANTAGE value: {}", advantage))?;
        }
        if let Ok(max_diff) = env::var("MAX_RATING_DIFF") {
            self.rating.max_rating_diff = max_diff
                .parse()
                .map_err(|_| anyhow!("Invalid MAX_RATING_DIFF value: {}", max_diff))?;
        }
        if let Ok(policy) = env::var("DRAW_POLICY") {
            self.rating.draw_policy = policy.parse()?;
        }

        // Render settings
        if let Ok(path) = env::var("HTML_OUTPUT") {
            self.render.output_path = Some(PathBuf::from(path));
        }
        if let Ok(top) = env::var("HIGHLIGHT_TOP") {
            self.render.highlight_top = top
                .parse()
                .map_err(|_| anyhow!("Invalid HIGHLIGHT_TOP value: {}", top))?;
        }

        Ok(())
    }
}

/// Validate configuration values
pub fn validate_config(config: &AppConfig) -> Result<()> {
    // Validate log level
    match config.service.log_level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.service.log_level)),
    }

    // Validate storage settings
    if config.storage.key.is_empty() {
        return Err(anyhow!("Storage key cannot be empty"));
    }
    if config.storage.backend == StorageBackend::File
        && config.storage.directory.as_os_str().is_empty()
    {
        return Err(anyhow!("Storage directory cannot be empty for the file backend"));
    }

    // Validate render settings
    if config.render.highlight_class.is_empty() {
        return Err(anyhow!("Highlight class cannot be empty"));
    }

    config.rating.validate()?;

    Ok(())
}
