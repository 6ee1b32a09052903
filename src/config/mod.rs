//! Configuration management module
//!
//! Handles the run settings: built-in defaults, the optional YAML settings
//! file with its JSON schema, and semantic validation of the merged result.

pub mod schema;
pub mod validation;
pub mod yaml;

use crate::system::System;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "simregress.yaml";

/// Reference file suffixes replayed by default
pub const DEFAULT_EXTENSIONS: &[&str] = &["txt", "perf", "data", "dat"];

/// Settings of a regression pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Reference directory, or a single reference file
    pub refs_path: PathBuf,

    /// Root of the mirrored result tree
    pub results_path: PathBuf,

    /// Working directory of the simulation binary
    pub build_path: PathBuf,

    /// First test id to replay; values below 1 are treated as 1
    pub start_id: i64,

    /// Maximum mantissa deviation for a valid SNR point
    pub sensibility: f64,

    /// Simulation threads, 0 lets the simulator use every core
    pub n_threads: u32,

    /// Descend into sub-directories of the refs path
    pub recursive_scan: bool,

    /// Frame errors per SNR point, 0 keeps the simulator default
    pub max_fe: u64,

    /// Minimum ratio of valid SNR points for a weak pass
    pub weak_rate: f64,

    /// Seconds allowed per SNR point, 0 for no limit
    pub max_snr_time: u64,

    /// Print per-test details
    pub verbose: bool,

    /// Reference file suffixes, without the leading dot
    pub extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refs_path: PathBuf::from("refs"),
            results_path: PathBuf::from("test-regression-results"),
            build_path: PathBuf::from("build"),
            start_id: 1,
            sensibility: 1.0,
            n_threads: 0,
            recursive_scan: true,
            max_fe: 100,
            weak_rate: 0.8,
            max_snr_time: 600,
            verbose: false,
            extensions: DEFAULT_EXTENSIONS.iter().map(|&ext| ext.to_owned()).collect(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load_from_file(system: &dyn System, path: &Path) -> anyhow::Result<Self> {
        yaml::load_config(system, path)
    }

    /// Validate the merged settings
    pub fn validate(&self) -> anyhow::Result<()> {
        validation::validate_config(self)
    }

    /// Clamp values that have a documented fallback and tidy the extension list
    pub fn normalize(&mut self) {
        if self.start_id <= 0 {
            self.start_id = 1;
        }
        for ext in &mut self.extensions {
            *ext = ext.trim().trim_start_matches('.').to_owned();
        }
    }

    /// The first test id to replay, counted from 1
    #[must_use]
    pub fn first_test(&self) -> usize {
        usize::try_from(self.start_id).unwrap_or(usize::MAX).max(1)
    }
}
