// Allow missing docs for internal items in development
#![allow(missing_docs)]

//! Service handler - registry, dispatcher and HTTP server for typed services.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                        SERVICE SERVER                          │
//! ├───────────────────────────────────────────────────────────────┤
//! │   POST /<path>        GET /health         GET /metrics         │
//! │        │                                                       │
//! │  ┌─────┴──────────────────────────────────┐                    │
//! │  │   Middleware: Tracing → CORS → Limit   │                    │
//! │  └─────┬──────────────────────────────────┘                    │
//! │        │                                                       │
//! │  ┌─────┴──────────────────────────────────┐                    │
//! │  │   HandlerRegistry (path → endpoint)    │                    │
//! │  │   parse → [verify session] → handle    │                    │
//! │  └─────┬──────────────────────────────────┘                    │
//! └────────┼──────────────────────────────────────────────────────┘
//!          ▼
//!   UnauthedHandler / AuthedHandler
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use svc_handler::{HandlerRegistry, ServerConfig, ServiceServer};
//!
//! let config = ServerConfig::from_env()?;
//! let signer = Arc::new(SessionSigner::new(&config.session.secret_key()?)?);
//! let mut registry = HandlerRegistry::new(Arc::clone(&signer));
//! registry
//!     .register_unauthed(SignInHandler::new(signer))?
//!     .register_authed(GetChatHistoryHandler)?;
//! ServiceServer::new(config, registry)?.start(shutdown).await?;
//! ```
//!
//! # Security
//!
//! - Authed handlers never run unless the signed session verifies
//! - Every authentication failure yields the same 401 body
//! - Internal errors and handler panics yield a generic 500 body

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod handler;
pub mod middleware;
pub mod registry;
pub mod service;

pub use domain::{
    ApiError, ApiResult, ConfigError, CorrelationId, ErrorKind, LogContext, RegistryError,
    ServerConfig, ServerError, INTERNAL_ERROR_MESSAGE, UNAUTHORIZED_MESSAGE,
};
pub use handler::{AuthedHandler, UnauthedHandler};
pub use middleware::DispatchMetrics;
pub use registry::{HandlerRegistry, RESERVED_PATHS};
pub use service::ServiceServer;
