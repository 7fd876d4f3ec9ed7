//! HTTP middleware for the service server.
//!
//! Layer order: Request → Tracing → CORS → Body limit → Dispatch

pub mod cors;
pub mod metrics;
pub mod tracing;

pub use cors::create_cors_layer;
pub use metrics::DispatchMetrics;
pub use self::tracing::TracingLayer;
