//! Error types for the fallible edges of the crate.
//!
//! The controller itself never fails; degraded input turns into a warning
//! banner instead.

use std::path::PathBuf;

use thiserror::Error;

/// Error loading the preview configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Error reading or replaying an event tape.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid tape entry on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("Tape entries go back in time on line {line}")]
    OutOfOrder { line: usize },
    #[error(transparent)]
    Runtime(#[from] RuntimeStopped),
    #[error("Preview runtime panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The preview runtime task is no longer running.
#[derive(Debug, Error)]
#[error("Preview runtime has stopped")]
pub struct RuntimeStopped;
