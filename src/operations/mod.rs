//! Operations module
//!
//! Coordinates a regression pass: reference discovery, command line
//! tokenizing, simulation runs, metric comparison and reporting

pub mod command_line;
pub mod compare;
pub mod discovery;
pub mod metrics;
pub mod output;
pub mod reference;
pub mod replay;
pub mod report;
pub mod tokenize;

pub use compare::{Comparison, Criteria, Verdict, compare};
pub use discovery::{Discovery, discover_references};
pub use replay::{ReplayOperation, RunSummary};
pub use tokenize::tokenize;
