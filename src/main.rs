//! # `simregress`
//!
//! `simregress` drives a regression pass for a numerical simulation binary.
//! Every reference result file under the refs path records the command line
//! that produced it; the simulation is run again with that command line and
//! its frame error rates are compared with the recorded ones.
//!
//! ## Usage
//!
//! ```sh
//! simregress --refs-path refs --build-path build --max-fe 100 --weak-rate 0.8
//! ```
//!
//! Preview the simulations without running them:
//!
//! ```sh
//! simregress --refs-path refs/BCH --dry-run --output-format json
//! ```
//!
//! The exit code is the number of failed tests (0 when everything passed).

use clap::Parser as _;
use simregress::cli::Args;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let args = Args::parse();

    // The dry-run listing goes to stdout, keep the log quiet around it
    let log_level = if args.dry_run {
        "warn"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt().with_target(false).with_env_filter(filter).init();

    match simregress::run(args) {
        Ok(summary) => std::process::exit(summary.exit_code()),
        Err(err) => {
            error!("{:#}", err);
            std::process::exit(1);
        }
    }
}
