//! Discovery of reference files under the refs path
//!
//! Produces the ordered list of test cases and the directory layout that the
//! results tree has to mirror.

use crate::system::System;
use crate::utils::path::{has_supported_extension, is_backup_path};
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Reference files found under the refs path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// Directory the case paths are relative to
    pub refs_root: PathBuf,

    /// Reference files to replay, relative to `refs_root`, in test id order
    pub cases: Vec<PathBuf>,

    /// Directories to mirror under the results path, relative to `refs_root`
    /// (the empty path stands for the root itself)
    pub directories: Vec<PathBuf>,
}

impl Discovery {
    /// Full path of a case's reference file
    #[must_use]
    pub fn reference_path(&self, case: &Path) -> PathBuf {
        self.refs_root.join(case)
    }
}

/// Discover the reference files to replay
///
/// A directory is walked with siblings in file-name order, descending only
/// when `recursive` is set. Entries with a `~` in any path component are
/// ignored. A single file is accepted as the only case when its extension is
/// supported. A missing path is reported as a warning and yields no case.
pub fn discover_references(
    system: &dyn System,
    refs_path: &Path,
    recursive: bool,
    extensions: &[String],
) -> Result<Discovery> {
    if !system.exists(refs_path) {
        warn!("The path '{}' does not exist.", refs_path.display());
        return Ok(Discovery {
            refs_root: refs_path.to_path_buf(),
            ..Discovery::default()
        });
    }

    if !system.is_file(refs_path) {
        return discover_in_directory(system, refs_path, recursive, extensions);
    }

    let refs_root = refs_path.parent().unwrap_or(Path::new("")).to_path_buf();
    let cases = refs_path
        .file_name()
        .map(PathBuf::from)
        .filter(|name| has_supported_extension(name, extensions))
        .into_iter()
        .collect();

    Ok(Discovery {
        refs_root,
        cases,
        directories: vec![PathBuf::new()],
    })
}

fn discover_in_directory(
    system: &dyn System,
    refs_root: &Path,
    recursive: bool,
    extensions: &[String],
) -> Result<Discovery> {
    let max_depth = if recursive { None } else { Some(1) };
    let entries = system
        .walk_dir(refs_root, max_depth)
        .with_context(|| format!("Failed to scan references in {}", refs_root.display()))?;

    let mut discovery = Discovery {
        refs_root: refs_root.to_path_buf(),
        cases: Vec::new(),
        directories: vec![PathBuf::new()],
    };

    for entry in entries {
        let Ok(relative) = entry.path.strip_prefix(refs_root) else {
            continue;
        };

        if is_backup_path(relative) {
            debug!("Ignoring backup entry: {}", relative.display());
            continue;
        }

        if entry.is_dir {
            if recursive {
                discovery.directories.push(relative.to_path_buf());
            }
        } else if entry.is_file && has_supported_extension(relative, extensions) {
            discovery.cases.push(relative.to_path_buf());
        }
    }

    debug!(
        "Discovered {} reference file(s) in {}",
        discovery.cases.len(),
        refs_root.display()
    );

    Ok(discovery)
}
