//! Error types for the seams between the bridge and its host collaborators.
//!
//! Application code works with `anyhow::Result`; these enums are what the
//! store, the cookie jar and the recording reader hand back.

use std::path::PathBuf;
use thiserror::Error;

use crate::sites::FolderId;

/// Errors raised while loading or saving the application state file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access state file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("state file {path:?} is not valid JSON: {source}")]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by a cookie jar when a single cookie cannot be stored.
#[derive(Debug, Error)]
pub enum CookieError {
    #[error("cookie database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid cookie {name:?} for {url:?}: {reason}")]
    Invalid {
        url: String,
        name: String,
        reason: String,
    },
}

/// A new folder would need an id past `FolderId::MAX`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("no folder id left after {last}")]
pub struct FolderIdsExhausted {
    pub last: FolderId,
}

/// Errors raised while reading a recorded importer event stream.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read recording {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line} of {path:?} is not a valid importer event: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("importer event channel closed")]
    ChannelClosed,
}
