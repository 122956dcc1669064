//! Error taxonomy for the remold client core.
//!
//! `TreeError` is the only error intrinsic to the structure tree model; the
//! remaining kinds belong to the surrounding storage, configuration, and
//! backend layers.

use thiserror::Error;

/// Errors raised by the structure tree model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// A write was attempted through an intermediate segment that holds a
    /// File. A File is never coerced into a Folder.
    #[error("invalid path: segment '{segment}' of '{path}' is a file, not a folder")]
    InvalidPath { path: String, segment: String },
}

/// Errors raised by document stores.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sled::Error),

    #[error("failed to encode stored value: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode stored value under key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors surfaced to callers of the client API.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("request to migrator backend failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error payload. Carries the `detail`
    /// string when the response body provided one, the status text
    /// otherwise.
    #[error("migrator backend rejected the request: {detail}")]
    BackendRejected { detail: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no active session: run `remold analyze` first")]
    NoSession,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
