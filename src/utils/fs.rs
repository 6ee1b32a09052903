//! File system utilities

use crate::error::RegressionError;
use crate::system::System;
use anyhow::Result;
use std::path::Path;

/// Create a directory and its parents, refusing to descend through a file
pub fn ensure_directory(system: &dyn System, dir_path: &Path) -> Result<()> {
    if system.is_dir(dir_path) {
        return Ok(());
    }

    system.create_dir_all(dir_path).map_err(|e| {
        RegressionError::filesystem(format!(
            "Failed to create directory {}: {e}",
            dir_path.display()
        ))
    })?;
    Ok(())
}

/// Create parent directories for a file path if they don't exist
pub fn create_parent_directories(system: &dyn System, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_directory(system, parent)?;
    }
    Ok(())
}

/// Write a text file, creating its parent directories first
pub fn write_text_file(system: &dyn System, file_path: &Path, contents: &str) -> Result<()> {
    create_parent_directories(system, file_path)?;
    system.write(file_path, contents.as_bytes()).map_err(|e| {
        RegressionError::filesystem(format!(
            "Failed to write result file {}: {e}",
            file_path.display()
        ))
    })?;
    Ok(())
}
