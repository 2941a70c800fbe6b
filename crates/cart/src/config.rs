//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `CATALOG_BASE_URL` - Base URL of the catalog API (e.g., http://localhost:3333)
//!
//! ## Optional
//! - `CART_STORAGE_DIR` - Directory holding the cart storage slot (default: .)
//! - `CART_STORAGE_SLOT` - File name of the storage slot (default: cart.json)

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Base URL of the catalog API. Always ends with a trailing slash so
    /// relative paths join below it rather than replacing the last segment.
    pub catalog_base_url: url::Url,
    /// Directory holding the cart storage slot.
    pub storage_dir: PathBuf,
    /// File name of the storage slot within `storage_dir`.
    pub storage_slot: String,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw_base_url = get_required_env("CATALOG_BASE_URL")?;
        let catalog_base_url = parse_base_url("CATALOG_BASE_URL", &raw_base_url)?;

        let storage_dir = PathBuf::from(get_env_or_default("CART_STORAGE_DIR", "."));
        let storage_slot = get_env_or_default("CART_STORAGE_SLOT", "cart.json");

        Ok(Self {
            catalog_base_url,
            storage_dir,
            storage_slot,
        })
    }

    /// Build a config directly, normalizing the base URL the same way
    /// [`from_env`](Self::from_env) does.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL.
    pub fn new(base_url: &str, storage_dir: &Path, storage_slot: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            catalog_base_url: parse_base_url("CATALOG_BASE_URL", base_url)?,
            storage_dir: storage_dir.to_path_buf(),
            storage_slot: storage_slot.to_string(),
        })
    }

    /// Full path of the cart storage slot.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.storage_dir.join(&self.storage_slot)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a base URL, forcing a trailing slash.
fn parse_base_url(key: &str, value: &str) -> Result<url::Url, ConfigError> {
    let normalized = if value.ends_with('/') {
        value.to_string()
    } else {
        format!("{value}/")
    };
    normalized
        .parse::<url::Url>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
