//! # Session Signer
//!
//! [`SessionSigner::build`] binds a payload to an HMAC-SHA256 tag;
//! [`SessionSigner::verify`] checks the tag and returns the payload.
//! The secret is injected at construction, so tests and processes can use
//! distinct keys without shared global state.

use crate::SessionError;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::fmt;
use svc_descriptor::{parse_message, serialize_message, Message};
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha256 = Hmac<Sha256>;

/// Separator between the encoded payload and the encoded tag.
const TOKEN_SEPARATOR: char = '.';

// =============================================================================
// SECRET KEY
// =============================================================================

/// Shared secret used to sign sessions.
///
/// Must be identical across every process that accepts the same sessions.
/// Never printed: `Debug` is redacted and there is no `Display`.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    /// Create from raw bytes. Empty keys are rejected.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self, SessionError> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(SessionError::EmptySecret);
        }
        Ok(Self(bytes))
    }

    /// Create from a configuration string.
    pub fn from_string(secret: impl Into<String>) -> Result<Self, SessionError> {
        Self::from_bytes(secret.into().into_bytes())
    }

    /// Get inner bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

// =============================================================================
// SIGNED SESSION
// =============================================================================

/// An opaque signed session token.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedSession(String);

impl SignedSession {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for SignedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignedSession({} bytes)", self.0.len())
    }
}

impl From<SignedSession> for String {
    fn from(session: SignedSession) -> Self {
        session.0
    }
}

// =============================================================================
// SIGNER
// =============================================================================

/// Builds and verifies signed sessions with a single secret key.
#[derive(Clone)]
pub struct SessionSigner {
    /// HMAC state keyed with the secret, cloned for every operation.
    keyed: HmacSha256,
}

impl SessionSigner {
    /// Create a signer for `key`.
    pub fn new(key: &SecretKey) -> Result<Self, SessionError> {
        let keyed =
            HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| SessionError::EmptySecret)?;
        Ok(Self { keyed })
    }

    /// Sign `payload`. Deterministic for a given key and payload.
    pub fn build(&self, payload: &[u8]) -> SignedSession {
        let mut mac = self.keyed.clone();
        mac.update(payload);
        let tag = mac.finalize().into_bytes();

        SignedSession(format!(
            "{}{}{}",
            URL_SAFE_NO_PAD.encode(payload),
            TOKEN_SEPARATOR,
            URL_SAFE_NO_PAD.encode(tag)
        ))
    }

    /// Verify `token` and return the signed payload.
    pub fn verify(&self, token: &str) -> Result<Vec<u8>, SessionError> {
        let (encoded_payload, encoded_tag) = token
            .split_once(TOKEN_SEPARATOR)
            .ok_or(SessionError::Malformed)?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded_payload)
            .map_err(|_| SessionError::Malformed)?;
        let tag = URL_SAFE_NO_PAD
            .decode(encoded_tag)
            .map_err(|_| SessionError::Malformed)?;

        let mut mac = self.keyed.clone();
        mac.update(&payload);
        mac.verify_slice(&tag)
            .map_err(|_| SessionError::InvalidSignature)?;

        Ok(payload)
    }

    /// Serialize `session` through its descriptor and sign it.
    pub fn build_session<S: Message>(&self, session: &S) -> Result<SignedSession, SessionError> {
        let value =
            serialize_message(session).map_err(|e| SessionError::InvalidPayload(e.to_string()))?;
        let payload =
            serde_json::to_vec(&value).map_err(|e| SessionError::InvalidPayload(e.to_string()))?;
        Ok(self.build(&payload))
    }

    /// Verify `token` and parse its payload through `S`'s descriptor.
    pub fn verify_session<S: Message>(&self, token: &str) -> Result<S, SessionError> {
        let payload = self.verify(token)?;
        let raw: serde_json::Value = serde_json::from_slice(&payload)
            .map_err(|e| SessionError::InvalidPayload(e.to_string()))?;
        parse_message(&raw).map_err(|e| SessionError::InvalidPayload(e.to_string()))
    }
}

impl fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSigner")
    }
}
