//! Session error types.

use thiserror::Error;

/// Session signing and verification errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Secret key was empty.
    #[error("session secret key is empty")]
    EmptySecret,

    /// Token is not of the form `payload.tag` with valid encodings.
    #[error("malformed session token")]
    Malformed,

    /// Tag does not match the payload.
    #[error("session signature verification failed")]
    InvalidSignature,

    /// Signature is valid but the payload is not the expected session message.
    #[error("invalid session payload: {0}")]
    InvalidPayload(String),
}
