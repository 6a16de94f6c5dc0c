//! Error types for Vitrine.
//!
//! Absence of data is never an error: a query that has not loaded yet is an
//! unset observable and a query with no matches is an empty snapshot. The
//! variants here cover the ambient failures around the pipeline.

use std::path::{Path, PathBuf};

/// Result type alias for Vitrine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Vitrine operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A persisted state file could not be decoded.
    #[error("Malformed state file {}: {message}", path.display())]
    State { path: PathBuf, message: String },
    /// Configuration could not be parsed.
    #[error("Invalid configuration: {message}")]
    Config { message: String },
    /// The background differ's worker thread is gone.
    #[error("Background differ worker has stopped")]
    WorkerStopped,
}

impl Error {
    /// Creates an I/O error for the given path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a malformed state error.
    pub fn state(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Error::State {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
