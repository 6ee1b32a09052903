//! Utility module
//!
//! Path and filesystem helpers shared by the operations

pub mod fs;
pub mod path;
