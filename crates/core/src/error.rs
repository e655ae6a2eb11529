//! Unified error types for coursefind.
//!
//! Every variant's display string starts with a stable code so log lines can be
//! grouped without parsing the message.

use tokio_rusqlite::rusqlite;

/// Unified error types for the coursefind client.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input (e.g., an empty search term).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Well-formed error response from the backend. The message is shown verbatim.
    #[error("SERVER_ERROR: {0}")]
    Server(String),

    /// Network failure, timeout, non-2xx status or malformed body.
    #[error("TRANSPORT_ERROR: {0}")]
    Transport(String),

    /// Store write rejected because it would exceed the byte quota.
    #[error("QUOTA_EXCEEDED: {needed} bytes requested, quota is {quota}")]
    QuotaExceeded { needed: u64, quota: u64 },

    /// Database operation failed.
    #[error("CACHE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("CACHE_ERROR: migration failed: {0}")]
    MigrationFailed(String),

    /// Cache payload could not be encoded.
    #[error("CACHE_ERROR: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True when a store write was refused for lack of space.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Error::QuotaExceeded { .. })
    }
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
