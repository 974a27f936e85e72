//! Process-level failures of the `faultline` binary.
//!
//! Each variant owns one exit code so scripts can tell a bad engine setup
//! from a disk problem. clap reports its own parse errors with code 2 before
//! [`CliError`] is ever built.

use faultline_core::SceneError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Engine construction or stepping failed (exit 10).
    #[error(transparent)]
    Engine(SceneError),

    /// Snapshot or seed file could not be read or written (exit 11).
    #[error("{0}")]
    Io(String),

    /// Malformed user input such as `--params` JSON or a seed file (exit 12).
    #[error("{0}")]
    Input(String),

    /// JSON output could not be produced (exit 13).
    #[error("cannot serialize output: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

/// Snapshot write failures are I/O and bad palette hex strings are user
/// input; everything else is an engine error.
impl From<SceneError> for CliError {
    fn from(e: SceneError) -> Self {
        match e {
            SceneError::Io(msg) => CliError::Io(msg),
            SceneError::InvalidColor(msg) => CliError::Input(format!("invalid color: {msg}")),
            other => CliError::Engine(other),
        }
    }
}
