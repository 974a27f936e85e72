//! Error types shared by every faultline crate.

use thiserror::Error;

/// Errors produced while configuring or running an engine.
///
/// Numerical work (fault displacement, normal estimation, integration) is
/// total over validated inputs, so every variant here is raised before any
/// computation begins.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A numeric parameter was out of its valid range (e.g. `div == 0`,
    /// `min_x >= max_x`, inverted radius bounds).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// The engine registry has no engine with this name.
    #[error("unknown engine: {0}")]
    UnknownEngine(String),

    /// Writing a snapshot failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl SceneError {
    /// Shorthand for building an [`SceneError::InvalidParameter`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        SceneError::InvalidParameter(msg.into())
    }
}
