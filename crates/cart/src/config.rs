//! Cart container configuration.
//!
//! # Environment Variables
//!
//! All optional:
//! - `CART_STORAGE_KEY` - Storage key for the cart record
//!   (default: `storefront:cart`)
//! - `CART_DATA_DIR` - Directory for file-backed persistence; when unset,
//!   the provider defaults to the in-memory backend

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Fixed, namespaced key identifying the cart record in storage.
pub const DEFAULT_STORAGE_KEY: &str = "storefront:cart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart container configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Storage key for the whole-value cart record.
    pub storage_key: String,
    /// Base directory for file-backed persistence, if any.
    pub data_dir: Option<PathBuf>,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            data_dir: None,
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set to an
    /// empty value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage_key = match env::var("CART_STORAGE_KEY") {
            Ok(value) if value.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "CART_STORAGE_KEY".to_owned(),
                    "must not be empty".to_owned(),
                ));
            }
            Ok(value) => value,
            Err(_) => DEFAULT_STORAGE_KEY.to_owned(),
        };

        let data_dir = match env::var("CART_DATA_DIR") {
            Ok(value) if value.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    "CART_DATA_DIR".to_owned(),
                    "must not be empty".to_owned(),
                ));
            }
            Ok(value) => Some(PathBuf::from(value)),
            Err(_) => None,
        };

        Ok(Self {
            storage_key,
            data_dir,
        })
    }
}
