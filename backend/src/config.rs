//! # Configuration
//!
//! Where the inventory file lives and how chatty the logs are.
//!
//! Resolution order, first match wins:
//! 1. `--data-file` on the command line
//! 2. the `INVENTORY_DATA_FILE` environment variable
//! 3. a YAML config file (`--config`, else `<config dir>/inventory/config.yaml`)
//! 4. `<data dir>/inventory/inventario.txt`
//!
//! ## YAML Format
//!
//! ```yaml
//! data_file: /home/flor/inventario.txt
//! log_level: debug
//! ```

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

pub const DATA_FILE_ENV: &str = "INVENTORY_DATA_FILE";

const APP_DIRECTORY: &str = "inventory";
const CONFIG_FILE_NAME: &str = "config.yaml";
const DEFAULT_DATA_FILE_NAME: &str = "inventario.txt";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// Backing CSV file of the inventory
    pub data_file: PathBuf,
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            log_level: "warn".to_string(),
        }
    }
}

impl InventoryConfig {
    /// Read a YAML config file. Keys that are missing take their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: InventoryConfig = serde_yaml::from_str(&yaml)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load the configuration from `explicit` or the default location, then
    /// apply the environment override.
    ///
    /// An explicit file must exist; the default one is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        Ok(config.with_env_override(std::env::var_os(DATA_FILE_ENV)))
    }

    /// Replace the data file with a non-empty environment value
    pub fn with_env_override(mut self, value: Option<OsString>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            debug!("Data file overridden by {}", DATA_FILE_ENV);
            self.data_file = PathBuf::from(value);
        }
        self
    }

    /// Replace the data file with a command line value
    pub fn with_data_file(mut self, data_file: Option<PathBuf>) -> Self {
        if let Some(data_file) = data_file {
            self.data_file = data_file;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIRECTORY).join(CONFIG_FILE_NAME))
}

/// Platform data directory, or the working directory when there is none
pub fn default_data_file() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIRECTORY).join(DEFAULT_DATA_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE_NAME))
}
