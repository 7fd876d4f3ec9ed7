//! CORS preflight handling.
//!
//! Wrapper around tower-http CORS built from [`CorsConfig`]. Browser clients
//! calling services cross-origin send an `OPTIONS` preflight first; the layer
//! answers it before the request reaches the dispatcher.

use crate::domain::config::CorsConfig;
use axum::http::{HeaderName, HeaderValue, Method};
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer as TowerCorsLayer};

/// Create CORS layer from server config, or `None` when CORS is disabled.
///
/// Credentials with a wildcard origin are rejected by
/// [`ServerConfig::validate`](crate::ServerConfig::validate) before this runs.
pub fn create_cors_layer(config: &CorsConfig) -> Option<TowerCorsLayer> {
    if !config.enabled {
        return None;
    }

    let mut cors = TowerCorsLayer::new();

    if config.allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if config.allowed_headers.iter().any(|h| h == "*") {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors = cors.max_age(Duration::from_secs(config.max_age));

    if config.allow_credentials {
        cors = cors.allow_credentials(true);
    }

    Some(cors)
}
