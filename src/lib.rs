//! `simregress` - A CLI tool for replaying simulation reference results
//!
//! This library walks a corpus of reference result files, re-runs the
//! simulation each one records, compares the fresh frame error rates with the
//! stored ones within a tolerance and reports a verdict per file.

pub mod cli;
pub mod config;
pub mod error;
pub mod operations;
pub mod system;
pub mod utils;

use anyhow::Result;
use cli::Args;
use operations::replay::{ReplayOperation, RunSummary};
use system::RealSystem;

/// Main entry point for the simregress library
pub fn run(args: Args) -> Result<RunSummary> {
    let system = RealSystem;
    let replay_operation = ReplayOperation::new(args, &system)?;
    replay_operation.execute()
}
