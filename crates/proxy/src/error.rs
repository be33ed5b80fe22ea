//! Transfer proxy error types.

use std::path::PathBuf;

use msalign_protocol::{LocatorError, Route};

/// Errors produced by the transfer proxy.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error(transparent)]
    InvalidLocator(#[from] LocatorError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{message} (HTTP {status})")]
    Remote { message: String, status: u16 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected {route} response: {message}")]
    Decode { route: Route, message: String },

    #[error("endpoint issued {actual} part URLs for {expected} parts")]
    PartCountMismatch { expected: u64, actual: usize },

    #[error("part {part} upload response has no ETag")]
    MissingEtag { part: u32 },

    #[error("downloaded file missing on disk: {}", .0.display())]
    IntegrityCheck(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer error: {0}")]
    Transfer(#[from] msalign_transfer::TransferError),

    #[error("task join error: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ProxyError {
    /// HTTP status of a remote failure, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProxyError::Remote { status, .. } => Some(*status),
            ProxyError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
