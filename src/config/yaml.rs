//! YAML configuration loading and parsing

use crate::config::Config;
use crate::error::RegressionError;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde_json::Value;
use std::path::Path;

/// Load and parse a YAML settings file
///
/// The raw document is checked against the embedded JSON schema before it is
/// deserialized, so unknown keys and out-of-range values are reported with
/// their schema message. An empty file yields the default settings.
pub fn load_config(system: &dyn System, path: &Path) -> Result<Config> {
    if !system.is_file(path) {
        return Err(RegressionError::configuration(format!(
            "Configuration file not found: {}",
            path.display()
        ))
        .into());
    }

    let content = system
        .read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

    let document: Value = serde_yaml::from_str(&content).map_err(|e| {
        RegressionError::configuration(format!(
            "Failed to parse YAML configuration in file {}: {e}",
            path.display()
        ))
    })?;

    if document.is_null() {
        return Ok(Config::default());
    }

    crate::config::schema::validate_against_schema(&document)
        .map_err(|e| RegressionError::configuration(format!("{}: {e}", path.display())))?;

    let config: Config = serde_json::from_value(document).map_err(|e| {
        RegressionError::configuration(format!(
            "Invalid configuration in file {}: {e}",
            path.display()
        ))
    })?;

    Ok(config)
}
