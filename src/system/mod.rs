//! System abstraction for filesystem and process operations
//!
//! This module provides a unified trait for all external system interactions,
//! allowing the replay loop to be tested with a mock implementation.

use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Entry from directory walking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_file: bool,
    pub is_dir: bool,
}

/// Captured result of a finished child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    /// Build a successful output with the given stdout
    #[must_use]
    pub fn success<S: Into<String>>(stdout: S) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Build a failed output with the given exit code and stderr
    #[must_use]
    pub fn failure<S: Into<String>>(code: i32, stderr: S) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the process exited with status 0
    #[must_use]
    #[inline]
    pub const fn succeeded(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Unified trait for system operations (filesystem + processes)
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::fs`, `walkdir` and `std::process`
/// - `MockSystem`: Test implementation using in-memory storage and scripted processes
pub trait System: Send + Sync {
    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write bytes to a file, creating it if it doesn't exist
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Recursively create a directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if a path points to a file
    fn is_file(&self, path: &Path) -> bool;

    /// Check if a path points to a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Walk a directory, returning all entries below it
    ///
    /// # Arguments
    /// * `path` - Root path to start walking from
    /// * `max_depth` - Deepest level to descend to, `None` for no limit
    ///
    /// # Returns
    /// Entries in depth-first order with siblings sorted by file name,
    /// excluding the root itself. Symbolic links are followed.
    fn walk_dir(&self, path: &Path, max_depth: Option<usize>) -> io::Result<Vec<WalkEntry>>;

    // ==================== Process Operations ====================

    /// Run a program to completion and capture its output
    ///
    /// Fails only when the process cannot be spawned or awaited; a non-zero
    /// exit status is reported through [`ProcessOutput::code`].
    fn run_process(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> io::Result<ProcessOutput>;
}
