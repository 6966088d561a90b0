//! Storage error types

use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reading or writing a storage slot
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("cannot create data directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no permission to access {path}")]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no space left writing {path}")]
    DiskFull {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The rename step of an atomic write failed; the previous value is intact
    #[error("cannot replace {to} with {from}: {source}")]
    Replace {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid slot name '{key}'")]
    InvalidKey { key: String },

    #[error("cannot encode slot '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Classify a write-side I/O error against `path`
    pub fn from_io(err: io::Error, path: PathBuf) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            return Self::PermissionDenied { path, source: err };
        }
        // ENOSPC
        if err.raw_os_error() == Some(28) {
            return Self::DiskFull { path, source: err };
        }
        Self::Write { path, source: err }
    }

    /// Short advice for the log line, when there is something the user can do
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::PermissionDenied { .. } | Self::CreateDir { .. } => {
                Some("check that the data directory is writable, or set data_dir in the config")
            }
            Self::DiskFull { .. } => Some("free some disk space; progress is kept in memory"),
            _ => None,
        }
    }
}
