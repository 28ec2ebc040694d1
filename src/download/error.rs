//! Error types for stream transfer and merging.
//!
//! Every variant carries the path or URL it concerns so a failure can be
//! reported without extra context from the caller.

use std::path::PathBuf;

use thiserror::Error;

use crate::transport::TransportError;

/// Errors that can occur while writing streams to disk or merging them.
#[derive(Debug, Error)]
pub enum TransferError {
    /// File system error (create directory, create file, write, spawn tool).
    #[error("IO error at {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The stream request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The stream URL from the catalog is malformed.
    #[error("invalid stream URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The merge tool exited with a non-zero status.
    #[error("merge failed: {stderr}")]
    MergeFailed {
        /// The tool's stderr, verbatim.
        stderr: String,
    },
}

impl TransferError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a merge failure from the tool's stderr.
    pub fn merge_failed(stderr: impl Into<String>) -> Self {
        Self::MergeFailed {
            stderr: stderr.into(),
        }
    }
}

// No `From<std::io::Error>`: the Io variant needs the path, which only the
// caller knows. `TransportError` already carries its URL, so it converts.
