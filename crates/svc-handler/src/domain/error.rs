//! Service error types and their HTTP mapping.
//!
//! Every failure that crosses the network boundary is an [`ApiError`] with a
//! status-bearing [`ErrorKind`] and a JSON body:
//!
//! ```json
//! {"error": {"code": 401, "message": "Unauthorized"}}
//! ```
//!
//! Internal errors never expose their detail to the caller; the detail is only
//! logged by the registry.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Message sent to callers for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Message sent to callers for every authentication failure.
pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";

/// Category of a service error, one per HTTP status used by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Body is not a JSON object, or does not fit the request type.
    BadRequest,
    /// Missing, malformed or tampered signed session.
    Unauthorized,
    /// No service registered at the path.
    NotFound,
    /// Registered path called with a method other than POST.
    MethodNotAllowed,
    /// Handler failure or panic.
    Internal,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Service error returned by handlers and by the registry.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub kind: ErrorKind,
    /// For `Internal`, diagnostic detail that is logged but never sent.
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Invalid request body
    pub fn bad_request(details: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::BadRequest,
            format!("Bad request: {}", details.into()),
        )
    }

    /// Authentication failure. The message is identical for every cause.
    pub fn unauthorized() -> Self {
        Self::new(ErrorKind::Unauthorized, UNAUTHORIZED_MESSAGE)
    }

    /// No service at `path`
    pub fn not_found(path: &str) -> Self {
        Self::new(ErrorKind::NotFound, format!("Service not found: {}", path))
    }

    /// Wrong HTTP method for a service path
    pub fn method_not_allowed(method: &str) -> Self {
        Self::new(
            ErrorKind::MethodNotAllowed,
            format!("Method not allowed: {}", method),
        )
    }

    /// Internal error; `details` is for logs only.
    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, details)
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    /// Message safe to send to the caller.
    pub fn public_message(&self) -> &str {
        match self.kind {
            ErrorKind::Internal => INTERNAL_ERROR_MESSAGE,
            _ => &self.message,
        }
    }

    /// Wire body for this error.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: ErrorDetail {
                code: self.status().as_u16(),
                message: self.public_message().to_string(),
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.status().as_u16(), self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::internal(format!("{:#}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_body())).into_response()
    }
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
}

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Startup configuration faults in the handler registry. All are fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Two services share a path
    #[error("duplicate service path {path}: already registered by {existing}")]
    DuplicatePath {
        path: &'static str,
        existing: &'static str,
    },

    /// Two services share a name
    #[error("duplicate service name {0}")]
    DuplicateName(&'static str),

    /// Path does not start with `/`
    #[error("service {service} has invalid path {path:?}: must start with '/'")]
    InvalidPath {
        service: &'static str,
        path: &'static str,
    },

    /// Path collides with a built-in endpoint
    #[error("service {service} uses reserved path {path}")]
    ReservedPath {
        service: &'static str,
        path: &'static str,
    },

    /// A message descriptor declares the same field twice
    #[error("message {message} declares field {field} more than once")]
    DuplicateField {
        message: &'static str,
        field: &'static str,
    },

    /// Authed request message does not declare the signed session field
    #[error("authed service {service} request {message} must declare a string field {field}")]
    MissingSessionField {
        service: &'static str,
        message: &'static str,
        field: &'static str,
    },
}

/// Server-level errors (not sent to callers).
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] crate::domain::config::ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(#[source] std::io::Error),

    /// Server terminated with an I/O error
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
