//! # Chat Service
//!
//! Demo application built on the service framework: an unauthed `SignIn`
//! service that issues signed sessions and an authed `GetChatHistory`
//! service that requires one.
//!
//! ```text
//! chat-client ──POST /SignIn {email,password}────────────► SignInHandler
//!             ◄────────────── {signedSession} ─────────────
//! chat-client ──POST /GetChatHistory {signedSession,...}──► GetChatHistoryHandler
//!             ◄────────────── {chatEntries:[...]} ─────────
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod handlers;
pub mod messages;
pub mod services;

pub use handlers::{GetChatHistoryHandler, SignInHandler};
pub use messages::{
    ChatEntry, GetChatHistoryRequest, GetChatHistoryResponse, SignInRequest, SignInResponse,
    UserSession,
};
pub use services::{GET_CHAT_HISTORY, SIGN_IN};

use std::sync::Arc;
use svc_handler::{HandlerRegistry, RegistryError};
use svc_session::SessionSigner;

/// Registry with both chat services registered.
pub fn build_registry(signer: Arc<SessionSigner>) -> Result<HandlerRegistry, RegistryError> {
    let mut registry = HandlerRegistry::new(Arc::clone(&signer));
    registry
        .register_unauthed(SignInHandler::new(signer))?
        .register_authed(GetChatHistoryHandler::new())?;
    Ok(registry)
}
