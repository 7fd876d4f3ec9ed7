//! Handler registry and dispatcher.
//!
//! The registry maps each service path to its handler. It is filled once at
//! startup, then shared read-only (`Arc<HandlerRegistry>`) by every request
//! task, so dispatch takes no locks.
//!
//! ## Dispatch Pipeline
//!
//! ```text
//! path ──► lookup ──► body JSON ──► [authed] verify signedSession ──► parse request
//!            │            │                      │                         │
//!           404          400                    401                       400
//!                                                                          ▼
//!                            response JSON ◄── serialize ◄── handler (panics → 500)
//! ```

use crate::domain::{ApiError, ApiResult, ErrorKind, LogContext, RegistryError};
use crate::handler::{AuthedHandler, UnauthedHandler};
use crate::middleware::DispatchMetrics;
use async_trait::async_trait;
use futures::FutureExt;
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use svc_descriptor::{
    parse_message, serialize_message, FieldType, Message, MessageDescriptor, PrimitiveType,
    ServiceInfo, SIGNED_SESSION_FIELD,
};
use svc_session::SessionSigner;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Paths served by the HTTP layer itself.
pub const RESERVED_PATHS: [&str; 2] = ["/health", "/metrics"];

// =============================================================================
// TYPE-ERASED ENDPOINTS
// =============================================================================

#[async_trait]
trait ErasedUnauthed: Send + Sync {
    async fn call(&self, ctx: &LogContext, body: &Value) -> ApiResult<Value>;
}

#[async_trait]
trait ErasedAuthed: Send + Sync {
    async fn call(&self, ctx: &LogContext, body: &Value, session_payload: &[u8])
        -> ApiResult<Value>;
}

struct UnauthedEndpoint<H>(H);

#[async_trait]
impl<H: UnauthedHandler> ErasedUnauthed for UnauthedEndpoint<H> {
    async fn call(&self, ctx: &LogContext, body: &Value) -> ApiResult<Value> {
        let request: H::Request =
            parse_message(body).map_err(|e| ApiError::bad_request(e.to_string()))?;
        let response = self.0.handle(ctx, request).await?;
        serialize_message(&response).map_err(|e| ApiError::internal(e.to_string()))
    }
}

struct AuthedEndpoint<H>(H);

#[async_trait]
impl<H: AuthedHandler> ErasedAuthed for AuthedEndpoint<H> {
    async fn call(
        &self,
        ctx: &LogContext,
        body: &Value,
        session_payload: &[u8],
    ) -> ApiResult<Value> {
        let session: H::Session = serde_json::from_slice::<Value>(session_payload)
            .ok()
            .and_then(|raw| parse_message(&raw).ok())
            .ok_or_else(|| {
                warn!("{}Signed session payload is not a valid session", ctx);
                ApiError::unauthorized()
            })?;
        let request: H::Request =
            parse_message(body).map_err(|e| ApiError::bad_request(e.to_string()))?;
        let response = self.0.handle(ctx, request, session).await?;
        serialize_message(&response).map_err(|e| ApiError::internal(e.to_string()))
    }
}

/// A registered service: the closed set of handler shapes.
enum Endpoint {
    Unauthed {
        info: ServiceInfo,
        handler: Box<dyn ErasedUnauthed>,
    },
    Authed {
        info: ServiceInfo,
        handler: Box<dyn ErasedAuthed>,
    },
}

impl Endpoint {
    fn info(&self) -> &ServiceInfo {
        match self {
            Endpoint::Unauthed { info, .. } | Endpoint::Authed { info, .. } => info,
        }
    }
}

// =============================================================================
// REGISTRY
// =============================================================================

/// Path-keyed registry of service handlers.
pub struct HandlerRegistry {
    signer: Arc<SessionSigner>,
    endpoints: HashMap<&'static str, Endpoint>,
    metrics: Arc<DispatchMetrics>,
}

impl HandlerRegistry {
    /// Create an empty registry verifying sessions with `signer`.
    pub fn new(signer: Arc<SessionSigner>) -> Self {
        Self {
            signer,
            endpoints: HashMap::new(),
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }

    /// Register a handler for an unauthed service.
    pub fn register_unauthed<H: UnauthedHandler>(
        &mut self,
        handler: H,
    ) -> Result<&mut Self, RegistryError> {
        let info = handler.descriptor().info();
        self.check_registration(&info)?;
        self.insert(Endpoint::Unauthed {
            info,
            handler: Box::new(UnauthedEndpoint(handler)),
        });
        Ok(self)
    }

    /// Register a handler for an authed service.
    pub fn register_authed<H: AuthedHandler>(
        &mut self,
        handler: H,
    ) -> Result<&mut Self, RegistryError> {
        let info = handler.descriptor().info();
        self.check_registration(&info)?;
        if !declares_session_field(info.request) {
            return Err(RegistryError::MissingSessionField {
                service: info.name,
                message: info.request.name,
                field: SIGNED_SESSION_FIELD,
            });
        }
        check_descriptor(<H::Session as Message>::descriptor())?;
        self.insert(Endpoint::Authed {
            info,
            handler: Box::new(AuthedEndpoint(handler)),
        });
        Ok(self)
    }

    fn check_registration(&self, info: &ServiceInfo) -> Result<(), RegistryError> {
        if !info.path.starts_with('/') {
            return Err(RegistryError::InvalidPath {
                service: info.name,
                path: info.path,
            });
        }
        if RESERVED_PATHS.contains(&info.path) {
            return Err(RegistryError::ReservedPath {
                service: info.name,
                path: info.path,
            });
        }
        if let Some(existing) = self.endpoints.get(info.path) {
            return Err(RegistryError::DuplicatePath {
                path: info.path,
                existing: existing.info().name,
            });
        }
        if self.endpoints.values().any(|e| e.info().name == info.name) {
            return Err(RegistryError::DuplicateName(info.name));
        }
        check_descriptor(info.request)?;
        check_descriptor(info.response)
    }

    fn insert(&mut self, endpoint: Endpoint) {
        let info = *endpoint.info();
        info!(
            service = info.name,
            path = info.path,
            kind = %info.kind,
            "Registered service"
        );
        self.endpoints.insert(info.path, endpoint);
    }

    /// Whether a service is registered at `path`.
    pub fn contains_path(&self, path: &str) -> bool {
        self.endpoints.contains_key(path)
    }

    /// Registered services, in no particular order.
    pub fn services(&self) -> impl Iterator<Item = &ServiceInfo> {
        self.endpoints.values().map(Endpoint::info)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    pub fn metrics(&self) -> Arc<DispatchMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Dispatch one call. Returns the serialized response body or the error
    /// to send back; never panics on handler failure.
    pub async fn dispatch(&self, path: &str, body: &[u8]) -> ApiResult<Value> {
        let start = Instant::now();

        let Some(endpoint) = self.endpoints.get(path) else {
            debug!(path, "No service registered for path");
            let err = ApiError::not_found(path);
            self.metrics.record(Err(err.kind), elapsed_ms(start));
            return Err(err);
        };

        let info = endpoint.info();
        let ctx = LogContext::new(info.name);
        let span = info_span!(
            "service_call",
            service = info.name,
            path = info.path,
            correlation_id = %ctx.correlation_id(),
        );

        let result = self.invoke(endpoint, &ctx, body).instrument(span).await;
        self.metrics
            .record(result.as_ref().map(|_| ()).map_err(|e| e.kind), elapsed_ms(start));
        result
    }

    async fn invoke(&self, endpoint: &Endpoint, ctx: &LogContext, body: &[u8]) -> ApiResult<Value> {
        let raw = parse_body(body)?;

        match endpoint {
            Endpoint::Unauthed { handler, .. } => {
                catch_handler_fault(ctx, handler.call(ctx, &raw)).await
            }
            Endpoint::Authed { handler, .. } => {
                let payload = self.verify_session(ctx, &raw)?;
                catch_handler_fault(ctx, handler.call(ctx, &raw, &payload)).await
            }
        }
    }

    /// Verified session payload of an authed request. The token itself is
    /// never logged.
    fn verify_session(&self, ctx: &LogContext, raw: &Value) -> ApiResult<Vec<u8>> {
        let Some(token) = raw.get(SIGNED_SESSION_FIELD).and_then(Value::as_str) else {
            warn!("{}Request carries no signed session", ctx);
            return Err(ApiError::unauthorized());
        };
        self.signer.verify(token).map_err(|e| {
            warn!(reason = %e, "{}Session verification failed", ctx);
            ApiError::unauthorized()
        })
    }
}

/// Runs a handler future, collapsing internal errors and panics into the
/// generic internal error.
async fn catch_handler_fault<F>(ctx: &LogContext, call: F) -> ApiResult<Value>
where
    F: std::future::Future<Output = ApiResult<Value>>,
{
    match AssertUnwindSafe(call).catch_unwind().await {
        Ok(Ok(value)) => {
            debug!("{}Service call completed", ctx);
            Ok(value)
        }
        Ok(Err(err)) if err.kind == ErrorKind::Internal => {
            error!(error = %err.message, "{}Handler failed", ctx);
            Err(err)
        }
        Ok(Err(err)) => {
            debug!(error = %err, "{}Handler rejected request", ctx);
            Err(err)
        }
        Err(panic) => {
            let detail = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            error!(panic = %detail, "{}Handler panicked", ctx);
            Err(ApiError::internal(format!("handler panicked: {}", detail)))
        }
    }
}

/// Empty bodies are treated as an empty message.
fn parse_body(body: &[u8]) -> ApiResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    let raw: Value = serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("invalid JSON: {}", e)))?;
    if !raw.is_object() {
        return Err(ApiError::bad_request("body must be a JSON object"));
    }
    Ok(raw)
}

fn declares_session_field(request: &MessageDescriptor) -> bool {
    request.field(SIGNED_SESSION_FIELD).is_some_and(|field| {
        !field.is_array && matches!(field.field_type, FieldType::Primitive(PrimitiveType::String))
    })
}

/// Rejects descriptors, nested ones included, that declare a field twice.
fn check_descriptor(descriptor: &'static MessageDescriptor) -> Result<(), RegistryError> {
    let mut seen: Vec<&'static MessageDescriptor> = Vec::new();
    let mut pending = vec![descriptor];
    while let Some(next) = pending.pop() {
        if seen.iter().any(|d| std::ptr::eq(*d, next)) {
            continue;
        }
        seen.push(next);
        if let Some(field) = next.duplicate_field() {
            return Err(RegistryError::DuplicateField {
                message: next.name,
                field,
            });
        }
        pending.extend(next.fields.iter().filter_map(|f| match f.field_type {
            FieldType::Message(nested) => Some(nested),
            FieldType::Primitive(_) => None,
        }));
    }
    Ok(())
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
