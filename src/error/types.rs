//! Custom error types

use thiserror::Error;

/// Main error type for simregress operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RegressionError {
    /// Configuration Error - invalid settings, config file or results path
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Filesystem Error - results could not be written
    #[error("Filesystem error: {message}")]
    Filesystem { message: String },

    /// Reference Error - a reference file could not be interpreted
    #[error("Reference error: {message}")]
    Reference { message: String },

    /// Simulation Error - the simulator could not be run or reported an error
    #[error("Simulation error: {message}")]
    Simulation { message: String },
}

impl RegressionError {
    /// Whether this error stops the whole run
    ///
    /// Reference and simulation errors only abort the test case they belong to.
    #[must_use]
    #[inline]
    pub const fn is_fatal(&self) -> bool {
        match *self {
            Self::Configuration { .. } | Self::Filesystem { .. } => true,
            Self::Reference { .. } | Self::Simulation { .. } => false,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a filesystem error
    #[inline]
    pub fn filesystem<S: Into<String>>(message: S) -> Self {
        Self::Filesystem {
            message: message.into(),
        }
    }

    /// Create a reference error
    #[inline]
    pub fn reference<S: Into<String>>(message: S) -> Self {
        Self::Reference {
            message: message.into(),
        }
    }

    /// Create a simulation error
    #[inline]
    pub fn simulation<S: Into<String>>(message: S) -> Self {
        Self::Simulation {
            message: message.into(),
        }
    }
}
