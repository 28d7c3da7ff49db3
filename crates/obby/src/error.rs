//! Pipeline errors.

use std::path::PathBuf;

use obby_core::UnknownId;
use obby_procedural::ConfigError;
use obby_scene::SceneError;
use thiserror::Error;

/// Anything that stops a pipeline run.
#[derive(Error, Debug)]
pub enum ObbyError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A theme name on the command line is not built in.
    #[error(transparent)]
    UnknownTheme(#[from] UnknownId),

    /// The scene could not be serialized.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// An output file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Target file.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A record could not be rendered as JSON.
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Strict mode and the validator found problems.
    #[error("validation failed with {issues} issue(s)")]
    ValidationFailed {
        /// Number of issues in the report.
        issues: usize,
    },
}

/// Result type for pipeline operations.
pub type ObbyResult<T> = Result<T, ObbyError>;
