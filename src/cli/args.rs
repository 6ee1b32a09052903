use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for simregress
///
/// Every run setting is optional here so that values coming from the
/// settings file are only overridden by flags the user actually passed.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "simregress")]
#[command(about = "A CLI tool for replaying simulation reference results as a regression test pass")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Path to the references to re-simulate (directory or single file) [default: refs]
    #[arg(long, value_name = "PATH", env = "SIMREGRESS_REFS_PATH")]
    pub refs_path: Option<PathBuf>,

    /// Path to the simulated results [default: test-regression-results]
    #[arg(long, value_name = "PATH", env = "SIMREGRESS_RESULTS_PATH")]
    pub results_path: Option<PathBuf>,

    /// Path to the simulator build, used as its working directory [default: build]
    #[arg(long, value_name = "PATH", env = "SIMREGRESS_BUILD_PATH")]
    pub build_path: Option<PathBuf>,

    /// Starting id to avoid computing results once again [default: 1]
    #[arg(long, value_name = "ID", allow_negative_numbers = true)]
    pub start_id: Option<i64>,

    /// Sensibility to verify a SNR point [default: 1.0]
    #[arg(long, value_name = "FLOAT")]
    pub sensibility: Option<f64>,

    /// Number of threads to use in the simulation, 0 = all available [default: 0]
    #[arg(long, value_name = "N")]
    pub n_threads: Option<u32>,

    /// Scan the refs path recursively [default: true]
    #[arg(
        long,
        value_name = "BOOL",
        num_args = 0..=1,
        default_missing_value = "true"
    )]
    pub recursive_scan: Option<bool>,

    /// Maximum number of frame errors to simulate per SNR point [default: 100]
    #[arg(long, value_name = "N")]
    pub max_fe: Option<u64>,

    /// Rate of valid SNR points to pass a test [default: 0.8]
    #[arg(long, value_name = "FLOAT")]
    pub weak_rate: Option<f64>,

    /// Maximum time to spend computing a SNR point in seconds, 0 = unlimited [default: 600]
    #[arg(long = "max-snr-time", value_name = "SECONDS")]
    pub max_snr_time: Option<u64>,

    /// Reference file extension to replay (can be specified multiple times) [default: txt, perf, data, dat]
    #[arg(long = "extension", value_name = "EXT")]
    pub extensions: Vec<String>,

    /// Settings file path [default: ./simregress.yaml when present]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// List the simulations that would run without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Output format for --dry-run: shell or json
    #[arg(
        long = "output-format",
        value_name = "FORMAT",
        default_value = "shell",
        requires = "dry_run"
    )]
    pub output_format: String,

    /// Enable the verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
