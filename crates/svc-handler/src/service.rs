//! Service server - HTTP entry point.
//!
//! Every registered service is reachable by `POST <path>` with a JSON body.
//! Anything that is not a built-in route falls through to the dispatcher.

use crate::domain::{ApiError, ServerConfig, ServerError};
use crate::middleware::{create_cors_layer, TracingLayer};
use crate::registry::HandlerRegistry;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// HTTP server hosting a [`HandlerRegistry`].
pub struct ServiceServer {
    config: ServerConfig,
    registry: Arc<HandlerRegistry>,
}

impl ServiceServer {
    /// Create a server. The registry is frozen from here on.
    pub fn new(config: ServerConfig, registry: HandlerRegistry) -> Result<Self, ServerError> {
        config.validate()?;

        if registry.is_empty() {
            warn!("Starting service server with no registered services");
        }

        Ok(Self {
            config,
            registry: Arc::new(registry),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn registry(&self) -> Arc<HandlerRegistry> {
        Arc::clone(&self.registry)
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let state = AppState {
            registry: Arc::clone(&self.registry),
        };

        let mut router = Router::new()
            .route("/health", get(health_check))
            .route("/metrics", get(metrics))
            .fallback(handle_service_call)
            .layer(DefaultBodyLimit::max(self.config.limits.max_request_size));

        if let Some(cors) = create_cors_layer(&self.config.cors) {
            router = router.layer(cors);
        }

        router.layer(TracingLayer::new()).with_state(state)
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn start<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;
        self.serve(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr().map_err(ServerError::Bind)?;
        for service in self.registry.services() {
            info!(
                service = service.name,
                path = service.path,
                kind = %service.kind,
                "Serving"
            );
        }
        info!(%addr, services = self.registry.len(), "Service server listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(ServerError::Serve)?;

        info!("Service server stopped");
        Ok(())
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    registry: Arc<HandlerRegistry>,
}

/// Dispatch `POST <path>` to the registered service.
async fn handle_service_call(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path();

    if method != Method::POST {
        let registry = &state.registry;
        if registry.contains_path(path) {
            let err = ApiError::method_not_allowed(method.as_str());
            registry.metrics().record(Err(err.kind), 0);
            let mut response = err.into_response();
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
            return response;
        }
        let err = ApiError::not_found(path);
        registry.metrics().record(Err(err.kind), 0);
        return err.into_response();
    }

    match state.registry.dispatch(path, &body).await {
        Ok(value) => (StatusCode::OK, Json(value)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "svc-handler",
        "version": env!("CARGO_PKG_VERSION"),
        "services": state.registry.len(),
    }))
}

/// Dispatch metrics endpoint
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.registry.metrics().to_json())
}
