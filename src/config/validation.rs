//! Configuration validation logic

use crate::config::Config;
use crate::error::RegressionError;
use anyhow::Result;
use std::path::Path;

/// Validate merged settings
///
/// # Errors
///
/// Returns an error if:
/// - A path setting is empty
/// - The sensibility is negative or not a number
/// - The weak rate is outside `[0, 1]`
/// - No usable file extension remains
#[inline]
pub fn validate_config(config: &Config) -> Result<()> {
    validate_path("refs path", &config.refs_path)?;
    validate_path("results path", &config.results_path)?;
    validate_path("build path", &config.build_path)?;

    if !config.sensibility.is_finite() || config.sensibility < 0.0 {
        return Err(RegressionError::configuration(format!(
            "Sensibility must be a non-negative number, got {}",
            config.sensibility
        ))
        .into());
    }

    if !(0.0..=1.0).contains(&config.weak_rate) {
        return Err(RegressionError::configuration(format!(
            "Weak rate must be between 0 and 1, got {}",
            config.weak_rate
        ))
        .into());
    }

    if config.extensions.is_empty() {
        return Err(RegressionError::configuration(
            "At least one reference file extension is required",
        )
        .into());
    }

    for ext in &config.extensions {
        if ext.trim().trim_start_matches('.').is_empty() {
            return Err(RegressionError::configuration(format!(
                "Invalid reference file extension: '{ext}'"
            ))
            .into());
        }
    }

    Ok(())
}

fn validate_path(name: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(RegressionError::configuration(format!("The {name} cannot be empty")).into());
    }
    Ok(())
}
