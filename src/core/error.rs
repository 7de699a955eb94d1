//! MB-002: Build error taxonomy.

use std::path::{Path, PathBuf};

/// Status code returned by tasks and the pipeline. 0 means success.
pub type Status = i32;

/// Generic failure status for errors detected by the orchestrator itself.
pub const FAILURE: Status = 1;

/// Errors raised while planning or running build tasks.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A declared task input could not be stat'ed.
    #[error("{}: {source}", path.display())]
    MissingDependency {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading a template or writing an artifact failed.
    #[error("cannot access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An external tool could not be spawned or produced unusable output.
    #[error("{tool}: {message}")]
    Tool { tool: String, message: String },

    /// Invalid or unreadable build configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Event log serialization failed.
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl BuildError {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Status a task reports when it ends with this error.
    pub fn status(&self) -> Status {
        FAILURE
    }
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
