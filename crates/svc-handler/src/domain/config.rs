//! Server configuration with validation.
//!
//! Defaults are overridden from environment variables by
//! [`ServerConfig::from_env`]:
//!
//! | Variable | Field |
//! |---|---|
//! | `SVC_HTTP_HOST` | `http.host` |
//! | `SVC_HTTP_PORT` | `http.port` |
//! | `SVC_MAX_REQUEST_SIZE` | `limits.max_request_size` |
//! | `SVC_CORS_ORIGINS` | `cors.allowed_origins` (comma separated) |
//! | `SVC_SECRET_KEY` | `session.secret_key` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use svc_session::SecretKey;

pub const ENV_HTTP_HOST: &str = "SVC_HTTP_HOST";
pub const ENV_HTTP_PORT: &str = "SVC_HTTP_PORT";
pub const ENV_MAX_REQUEST_SIZE: &str = "SVC_MAX_REQUEST_SIZE";
pub const ENV_CORS_ORIGINS: &str = "SVC_CORS_ORIGINS";
pub const ENV_SECRET_KEY: &str = "SVC_SECRET_KEY";

/// Main server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// CORS configuration (preflight handling)
    pub cors: CorsConfig,
    /// Request limits
    pub limits: LimitsConfig,
    /// Session signing configuration
    pub session: SessionConfig,
}

impl ServerConfig {
    /// Load defaults with environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (an environment-like key/value source).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(ENV_HTTP_HOST) {
            self.http.host = parse_var(ENV_HTTP_HOST, &host)?;
        }
        if let Some(port) = lookup(ENV_HTTP_PORT) {
            self.http.port = parse_var(ENV_HTTP_PORT, &port)?;
        }
        if let Some(size) = lookup(ENV_MAX_REQUEST_SIZE) {
            self.limits.max_request_size = parse_var(ENV_MAX_REQUEST_SIZE, &size)?;
        }
        if let Some(origins) = lookup(ENV_CORS_ORIGINS) {
            self.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(secret) = lookup(ENV_SECRET_KEY) {
            self.session.secret_key = Some(secret);
        }
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.limits.max_request_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_request_size cannot be 0".into(),
            ));
        }

        if self.cors.enabled
            && self.cors.allow_credentials
            && self.cors.allowed_origins.iter().any(|o| o == "*")
        {
            return Err(ConfigError::InvalidCors(
                "allow_credentials cannot be combined with wildcard origin".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

fn parse_var<T: std::str::FromStr>(var: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
        var,
        value: value.to_string(),
    })
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 80)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 80,
        }
    }
}

/// Request limits configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Max request body size in bytes (default: 1MB)
    pub max_request_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_request_size: 1024 * 1024,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Enable CORS
    pub enabled: bool,
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Max age for preflight cache
    pub max_age: u64,
    /// Allow credentials
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec!["Content-Type".to_string()],
            max_age: 86400, // 24 hours
            allow_credentials: false,
        }
    }
}

/// Session signing configuration.
///
/// The secret is never serialized and never printed.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(skip_serializing)]
    pub secret_key: Option<String>,
}

impl SessionConfig {
    /// The configured secret key. Missing or empty is a startup fault.
    pub fn secret_key(&self) -> Result<SecretKey, ConfigError> {
        let secret = self
            .secret_key
            .as_deref()
            .ok_or(ConfigError::MissingSecretKey)?;
        SecretKey::from_string(secret).map_err(|_| ConfigError::MissingSecretKey)
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field(
                "secret_key",
                &self.secret_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Secret key absent or empty
    #[error("session secret key is not set (set SVC_SECRET_KEY)")]
    MissingSecretKey,
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Invalid CORS settings
    #[error("invalid cors configuration: {0}")]
    InvalidCors(String),
    /// Environment variable could not be parsed
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}
