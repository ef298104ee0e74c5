//! Configuration management for carrental.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::storage::files::{CARS_FILE, CUSTOMERS_FILE, PAYMENTS_FILE, RENTALS_FILE};
use crate::storage::DataFiles;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "carrental";

/// Prefix of environment variables overriding configuration.
const ENV_PREFIX: &str = "CARRENTAL_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CARRENTAL_`, sections split by `__`)
/// 2. TOML config file at `~/.config/carrental/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Interactive shell configuration.
    pub shell: ShellConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the data files.
    /// Defaults to `~/.local/share/carrental`
    pub data_dir: Option<PathBuf>,
    /// File name of the cars file.
    pub cars_file: String,
    /// File name of the customers file.
    pub customers_file: String,
    /// File name of the rentals file.
    pub rentals_file: String,
    /// File name of the payments file.
    pub payments_file: String,
}

/// Interactive shell configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Number of steps printed by the extra processing demo.
    pub extra_processing_steps: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None, // Will be resolved to default at runtime
            cars_file: CARS_FILE.to_string(),
            customers_file: CUSTOMERS_FILE.to_string(),
            rentals_file: RENTALS_FILE.to_string(),
            payments_file: PAYMENTS_FILE.to_string(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            extra_processing_steps: 5,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("cars_file", &self.storage.cars_file),
            ("customers_file", &self.storage.customers_file),
            ("rentals_file", &self.storage.rentals_file),
            ("payments_file", &self.storage.payments_file),
        ];

        for (key, name) in &names {
            if name.trim().is_empty() {
                return Err(Error::config_validation(format!(
                    "{key} must not be empty"
                )));
            }
            if name.contains(['/', '\\']) {
                return Err(Error::config_validation(format!(
                    "{key} must be a file name, not a path: {name}"
                )));
            }
        }

        for (i, (key, name)) in names.iter().enumerate() {
            if let Some((other, _)) = names[i + 1..].iter().find(|(_, n)| n == name) {
                return Err(Error::config_validation(format!(
                    "{key} and {other} both point to {name}"
                )));
            }
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the resolved locations of the four data files.
    #[must_use]
    pub fn data_files(&self) -> DataFiles {
        DataFiles::with_names(
            self.data_dir(),
            &self.storage.cars_file,
            &self.storage.customers_file,
            &self.storage.rentals_file,
            &self.storage.payments_file,
        )
    }
}
