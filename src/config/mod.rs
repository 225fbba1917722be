//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `GREEN_MIRROR` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use green_mirror::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Profile stored at {}", config.storage.record_path().display());
//! ```

mod ai;
mod error;
mod identity;
mod logging;
mod storage;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use identity::IdentityConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults; only the Gemini key is required, and only
/// when the Gemini provider is selected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Analysis and visualization engines
    #[serde(default)]
    pub ai: AiConfig,

    /// Profile record location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Identity used on sign-in
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Log level and format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `GREEN_MIRROR` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `GREEN_MIRROR__AI__GEMINI_API_KEY=...` -> `ai.gemini_api_key = ...`
    /// - `GREEN_MIRROR__STORAGE__DATA_DIR=/var/lib/green-mirror` -> `storage.data_dir`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("GREEN_MIRROR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.storage.validate()?;
        self.identity.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
