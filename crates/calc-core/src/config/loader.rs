//! Configuration loader for YAML files

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::types::CalcConfig;
use crate::errors::CalcError;

/// Location of the per-user config file, relative to the platform config dir
pub const USER_CONFIG_PATH: &str = "calc-agent/config.yaml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<CalcConfig, CalcError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path).map_err(|e| {
            CalcError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        log::debug!("Loaded configuration from {}", path.display());
        Self::from_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_str(content: &str) -> Result<CalcConfig, CalcError> {
        // serde_yaml rejects an empty document, which should mean "all defaults"
        if content.trim().is_empty() {
            return Ok(CalcConfig::default());
        }

        let config: CalcConfig = serde_yaml::from_str(content)
            .map_err(|e| CalcError::Config(format!("Failed to parse YAML config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(USER_CONFIG_PATH))
    }

    /// Load the per-user config file if one exists, otherwise defaults
    pub fn load_default() -> Result<CalcConfig, CalcError> {
        match Self::user_config_path() {
            Some(path) if path.exists() => Self::from_file(path),
            _ => {
                log::debug!("No user configuration found, using defaults");
                Ok(CalcConfig::default())
            }
        }
    }
}
