//! Fatal error types for permtune operations

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop an operation before it produces output.
#[derive(Error, Debug)]
pub enum TuneError {
    /// An input file does not exist
    #[error("the file '{}' does not exist", .0.display())]
    MissingFile(PathBuf),

    /// Reading or writing a file failed
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A ranked results line has no second column
    #[error("line {line} of '{}' does not have two columns", path.display())]
    MissingColumn { path: PathBuf, line: usize },

    /// A ranked results line has a non-numeric second column
    #[error("line {line} of '{}' has a non-numeric score '{value}'", path.display())]
    BadScore {
        path: PathBuf,
        line: usize,
        value: String,
    },

    /// Sweep rank outside the supported range
    #[error("unsupported sweep rank {0} (expected 1..=8)")]
    InvalidRank(usize),

    /// Configuration file could not be understood
    #[error("config error: {0}")]
    Config(String),

    /// Report serialization failed
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TuneError {
    /// Wrap an I/O error, mapping `NotFound` to [`TuneError::MissingFile`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            TuneError::MissingFile(path)
        } else {
            TuneError::Io { path, source }
        }
    }
}

/// Result type alias for permtune operations
pub type Result<T> = std::result::Result<T, TuneError>;
