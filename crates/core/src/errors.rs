//! Core error types for Fabricscope.
//!
//! Classification, aggregation and browsing never fail: malformed data
//! degrades to zero values instead. Errors only exist at the edges where
//! catalogs and snapshots are parsed or read from disk.

use thiserror::Error;

use crate::health::RegistryError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the core crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Category registry is invalid: {0}")]
    Registry(#[from] RegistryError),

    #[error("Snapshot is malformed: {0}")]
    Snapshot(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates an Io error for the given path.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
