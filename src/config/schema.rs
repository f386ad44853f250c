//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the observer
//! and its host server. All types derive Serde traits for deserialization
//! from config files.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

/// Root configuration for the host server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request observer settings.
    pub observer: ObserverConfig,

    /// Log output settings.
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Which measured size `body_size_limit` is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BodyLimitTarget {
    /// Size of the response body produced by the handler chain.
    #[default]
    Response,
    /// Size of the buffered request body.
    Request,
}

/// How the request start time is rendered into the record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// RFC 3339 with second precision.
    #[default]
    Rfc3339,
    /// A `strftime`-style pattern understood by chrono.
    Custom(String),
}

impl TimeFormat {
    /// Whether the format can be rendered without a formatting error.
    pub fn is_valid(&self) -> bool {
        match self {
            TimeFormat::Rfc3339 => true,
            TimeFormat::Custom(pattern) => {
                !pattern.is_empty()
                    && !StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
            }
        }
    }
}

/// Request observer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Exact request paths that never produce a record.
    pub excluded_paths: Vec<String>,

    /// Capture JSON request bodies.
    pub capture_body: bool,

    /// Capture is suppressed when the measured size exceeds this many bytes.
    pub body_size_limit: u64,

    /// Size the limit applies to.
    pub body_limit_target: BodyLimitTarget,

    /// Upper bound on bytes buffered from the request stream for capture.
    pub max_buffered_body: usize,

    /// Start time rendering.
    pub time_format: TimeFormat,

    /// Render the start time in UTC instead of local time.
    pub utc: bool,

    /// Hostname override. Resolved from the OS when unset.
    pub hostname: Option<String>,

    /// Derive the client IP from `X-Forwarded-For` / `X-Real-IP`.
    pub trust_forwarded_headers: bool,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            excluded_paths: Vec::new(),
            capture_body: true,
            body_size_limit: 500_000,
            body_limit_target: BodyLimitTarget::default(),
            max_buffered_body: 1024 * 1024,
            time_format: TimeFormat::default(),
            utc: false,
            hostname: None,
            trust_forwarded_headers: true,
        }
    }
}

impl ObserverConfig {
    /// Add a path that should never be logged.
    pub fn exclude(mut self, path: impl Into<String>) -> Self {
        self.excluded_paths.push(path.into());
        self
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive (trace, debug, info, warn, error, or a full
    /// `EnvFilter` expression). `RUST_LOG` takes precedence.
    pub level: String,

    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}
