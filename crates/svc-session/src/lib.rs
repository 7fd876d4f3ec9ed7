//! # Session Signing
//!
//! Creates and verifies tamper-evident session tokens.
//!
//! ## Security Properties
//!
//! - **HMAC-SHA256**: the tag is computed over the payload with a shared secret.
//! - **Stateless**: a token carries its own payload; any process holding the
//!   same secret can verify it without session storage.
//! - **Constant-time verification**: tags are compared with `Mac::verify_slice`.
//! - **Uniform failure**: verification returns a typed [`SessionError`] and
//!   never panics on malformed input.
//!
//! ## Token Format
//!
//! ```text
//! base64url(payload) "." base64url(hmac_sha256(secret, payload))
//! ```
//!
//! Clients must treat the token as opaque and resend it verbatim.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod errors;
pub mod signer;

pub use errors::SessionError;
pub use signer::{SecretKey, SessionSigner, SignedSession};
