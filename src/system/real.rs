//! Real system implementation using `std::fs`, `walkdir` and `std::process`

use super::{ProcessOutput, System, WalkEntry};
use std::fs;
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::warn;
use walkdir::WalkDir;

/// Production implementation of System trait
///
/// This implementation directly delegates to the standard library and `walkdir`.
#[derive(Debug, Clone, Copy)]
pub struct RealSystem;

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for RealSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for RealSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn walk_dir(&self, path: &Path, max_depth: Option<usize>) -> io::Result<Vec<WalkEntry>> {
        if !path.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Directory not found: {}", path.display()),
            ));
        }

        let mut walker = WalkDir::new(path)
            .follow_links(true)
            .min_depth(1)
            .sort_by_file_name();
        if let Some(depth) = max_depth {
            walker = walker.max_depth(depth);
        }

        let mut entries = Vec::new();
        for entry in walker {
            match entry {
                Ok(entry) => entries.push(WalkEntry {
                    path: entry.path().to_path_buf(),
                    is_file: entry.file_type().is_file(),
                    is_dir: entry.file_type().is_dir(),
                }),
                Err(err) => warn!("Skipping unreadable entry: {}", err),
            }
        }

        Ok(entries)
    }

    fn run_process(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> io::Result<ProcessOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;

        Ok(ProcessOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
