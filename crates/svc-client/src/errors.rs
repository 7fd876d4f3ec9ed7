//! Client error types.

use svc_descriptor::DescriptorError;
use thiserror::Error;

/// Errors that can occur when calling a service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Authed call attempted with no stored session
    #[error("no signed session stored; sign in first")]
    Unauthenticated,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Connection failed: {0}")]
    Connection(String),

    /// Server answered with a non-success status
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error("session storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ClientError {
    /// HTTP status of a non-success reply, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure means the caller must sign in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthenticated) || self.status() == Some(401)
    }
}

/// Session storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
