//! Error types for directory tree hashing.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure a hashing run can hit.
///
/// All errors abort the run; nothing is retried and no partial result map is
/// handed to the output stage.
#[derive(Debug, Error)]
pub enum HashTreeError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Unsupported entry type ({kind}) at {path:?}")]
    UnsupportedEntryType { path: PathBuf, kind: &'static str },

    #[error("Digest for child {child} missing while aggregating {parent}")]
    MissingChildDigest { parent: String, child: String },

    #[error("Path key recorded twice: {0}")]
    DuplicateKey(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Path is not valid UTF-8: {0:?}")]
    NonUtf8Path(PathBuf),

    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    #[error("Symlink loop detected at {0:?}")]
    SymlinkLoop(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HashTreeError {
    /// Wrap an I/O error with the path it happened at.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HashTreeError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for HashTreeError {
    fn from(err: config::ConfigError) -> Self {
        HashTreeError::Config(err.to_string())
    }
}
