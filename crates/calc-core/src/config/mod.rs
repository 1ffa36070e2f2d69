//! Configuration module
//!
//! Settings come from an optional YAML file. Missing sections fall back to
//! defaults, so most users never need one.

pub mod loader;
pub mod types;

pub use loader::*;
pub use types::*;


use crate::errors::CalcError;
use std::path::Path;

/// Load a configuration from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CalcConfig, CalcError> {
    ConfigLoader::from_file(path)
}

/// Validate a configuration
pub fn validate_config(config: &CalcConfig) -> Result<(), CalcError> {
    config.validate()
}
