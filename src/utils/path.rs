//! Path helpers for reference discovery and simulator invocation

use std::path::{Component, Path, PathBuf};

/// Check if a path has one of the given extensions (case-sensitive, no leading dot)
#[must_use]
pub fn has_supported_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|candidate| candidate == ext))
}

/// Check if any component of a path is an editor backup (contains `~`)
#[must_use]
pub fn is_backup_path(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().contains('~'),
        _ => false,
    })
}

/// Resolve the program of a recorded command line against the build directory
///
/// Bare names are left for a `PATH` lookup and absolute paths are kept.
/// Relative paths with a directory part, like `bin/sim` or `./sim`, are
/// joined onto the build directory so that they do not depend on how the
/// platform resolves programs for a child with another working directory.
#[must_use]
pub fn resolve_program(build_path: &Path, program: &str) -> PathBuf {
    let program_path = Path::new(program);
    if program_path.is_absolute() || program_path.components().count() < 2 {
        return program_path.to_path_buf();
    }
    build_path.join(program_path)
}

/// The location under `results_root` that mirrors `relative`
#[must_use]
pub fn mirror_path(results_root: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        return results_root.to_path_buf();
    }
    results_root.join(relative)
}
