//! # Service Client
//!
//! Typed client for services declared with `svc-descriptor`.
//!
//! ```ignore
//! use svc_client::{FileSessionStorage, ServiceClient};
//!
//! let client = ServiceClient::new("http://localhost:8080", FileSessionStorage::new(path))?;
//! let response = client.fetch_unauthed(&request, &SIGN_IN).await?;
//! if let Some(token) = response.signed_session {
//!     client.save_session(&token)?;
//! }
//! let history = client.fetch_authed(&history_request, &GET_CHAT_HISTORY).await?;
//! ```
//!
//! Authed calls read the stored signed session and send it in the request
//! body. A call without a stored session fails with
//! [`ClientError::Unauthenticated`] before touching the network; a 401 reply
//! clears the stored session.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod client;
pub mod errors;
pub mod storage;

pub use client::ServiceClient;
pub use errors::{ClientError, StorageError};
pub use storage::{FileSessionStorage, InMemorySessionStorage, SessionStorage};
