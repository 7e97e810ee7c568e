//! Configuration management for the pulseball service
//!
//! This module handles configuration loading from environment variables and
//! TOML files, validation, and default values.

pub mod app;
pub mod rating;

// Re-export commonly used types
pub use app::{
    validate_config, AppConfig, RenderSettings, ServiceSettings, StorageBackend,
    StorageSettings, DEFAULT_STORAGE_KEY,
};
pub use rating::{DrawPolicy, RatingConfig};
