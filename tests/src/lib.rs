//! # Service Test Suite
//!
//! Unified test crate running the framework end to end over loopback HTTP.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── support.rs          # Loopback server harness
//! └── integration/
//!     ├── chat_flow.rs    # SignIn → GetChatHistory through the typed client
//!     ├── auth_gate.rs    # Authed services never run without a valid session
//!     └── dispatch.rs     # Registration faults, 404/405, panics, CORS
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p svc-tests
//! cargo test -p svc-tests integration::auth_gate::
//! ```

#![allow(dead_code)]

pub mod integration;

#[cfg(test)]
pub mod support;
