//! Error types for shingle-bench.
//!
//! Two kinds of failure abort a run: bad configuration (including pattern
//! sets an engine cannot work with) and unreadable input. Hash collisions in
//! the rolling-hash engine are resolved by verification and never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for shingle-bench operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while configuring or running a benchmark.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid configuration or a pattern set the engine cannot build from.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A file or directory could not be read.
    #[error("cannot read `{}`: {source}", path.display())]
    Input {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Input exists but is not usable (e.g. corpus is not a directory).
    #[error("invalid input `{}`: {message}", path.display())]
    InvalidInput {
        /// Offending path.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Returns true for configuration errors.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Returns true for input errors (unreadable or unusable paths).
    #[must_use]
    pub fn is_input(&self) -> bool {
        matches!(self, Self::Input { .. } | Self::InvalidInput { .. })
    }
}
