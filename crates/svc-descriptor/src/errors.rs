//! # Error Types
//!
//! Errors raised when a message value cannot be mapped onto its Rust type.

use thiserror::Error;

/// Errors that can occur while converting between wire values and messages.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The descriptor-filtered value does not fit the Rust type it describes.
    ///
    /// Field-level mismatches are dropped during parsing, so this only happens
    /// when the descriptor and the type disagree (e.g. a `Number` field backed
    /// by an integer type receiving a fractional value).
    #[error("message {message} does not match its type: {source}")]
    Shape {
        message: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// The message could not be turned into a JSON value.
    #[error("message {message} could not be serialized: {source}")]
    Serialize {
        message: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
