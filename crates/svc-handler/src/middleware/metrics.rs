//! Dispatch metrics.
//!
//! Plain atomic counters, exported as JSON on `/metrics`.

use crate::domain::ErrorKind;
use std::sync::atomic::{AtomicU64, Ordering};

/// Service call counters
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    // Request counters
    pub requests_total: AtomicU64,
    pub requests_success: AtomicU64,

    // Error counters, one per error kind
    pub bad_request: AtomicU64,
    pub unauthorized: AtomicU64,
    pub not_found: AtomicU64,
    pub method_not_allowed: AtomicU64,
    pub internal: AtomicU64,

    // Latency tracking (simplified - no histograms)
    pub total_latency_ms: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call outcome
    pub fn record(&self, outcome: Result<(), ErrorKind>, latency_ms: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms
            .fetch_add(latency_ms, Ordering::Relaxed);

        let counter = match outcome {
            Ok(()) => &self.requests_success,
            Err(ErrorKind::BadRequest) => &self.bad_request,
            Err(ErrorKind::Unauthorized) => &self.unauthorized,
            Err(ErrorKind::NotFound) => &self.not_found,
            Err(ErrorKind::MethodNotAllowed) => &self.method_not_allowed,
            Err(ErrorKind::Internal) => &self.internal,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get average latency in ms
    pub fn average_latency_ms(&self) -> f64 {
        let total = self.total_latency_ms.load(Ordering::Relaxed);
        let count = self.requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    /// Export metrics as JSON
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "requests": {
                "total": self.requests_total.load(Ordering::Relaxed),
                "success": self.requests_success.load(Ordering::Relaxed),
            },
            "errors": {
                "bad_request": self.bad_request.load(Ordering::Relaxed),
                "unauthorized": self.unauthorized.load(Ordering::Relaxed),
                "not_found": self.not_found.load(Ordering::Relaxed),
                "method_not_allowed": self.method_not_allowed.load(Ordering::Relaxed),
                "internal": self.internal.load(Ordering::Relaxed),
            },
            "latency": {
                "average_ms": self.average_latency_ms(),
            }
        })
    }
}
