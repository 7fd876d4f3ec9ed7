//! Correlation IDs and per-call log contexts.
//!
//! Uses UUID v7 for time-ordered, unique identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Correlation ID for tracking one service call through the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(Uuid);

impl CorrelationId {
    /// Generate a new correlation ID (UUID v7)
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse from string
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CorrelationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque context threaded through a single call for diagnostics.
///
/// Displays as a log prefix, e.g. `[SignIn 0190a1b2-...] `, so handlers can
/// write `info!("{}Signing in", ctx)`.
#[derive(Debug, Clone)]
pub struct LogContext {
    service: &'static str,
    correlation_id: CorrelationId,
}

impl LogContext {
    pub fn new(service: &'static str) -> Self {
        Self {
            service,
            correlation_id: CorrelationId::new(),
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn correlation_id(&self) -> CorrelationId {
        self.correlation_id
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] ", self.service, self.correlation_id)
    }
}
