//! Error handling module
//!
//! Defines the error type shared by the configuration layer and the replay loop

pub mod types;

pub use types::*;
