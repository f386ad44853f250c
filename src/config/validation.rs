//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, bind address parses)
//! - Reject time formats and filter directives that would only fail later
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use crate::config::schema::{ServerConfig, TimeFormat};

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g. `observer.hostname`).
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a valid socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new(
            "timeouts.request_secs",
            "must be greater than zero",
        ));
    }

    let observer = &config.observer;
    for path in &observer.excluded_paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(
                "observer.excluded_paths",
                format!("'{}' must start with '/'", path),
            ));
        }
    }

    if observer.capture_body && observer.max_buffered_body == 0 {
        errors.push(ValidationError::new(
            "observer.max_buffered_body",
            "must be greater than zero when body capture is enabled",
        ));
    }

    if let TimeFormat::Custom(pattern) = &observer.time_format {
        if !observer.time_format.is_valid() {
            errors.push(ValidationError::new(
                "observer.time_format",
                format!("'{}' is not a valid strftime pattern", pattern),
            ));
        }
    }

    if let Some(hostname) = &observer.hostname {
        if hostname.trim().is_empty() {
            errors.push(ValidationError::new("observer.hostname", "override must not be blank"));
        }
    }

    if EnvFilter::try_new(&config.logging.level).is_err() {
        errors.push(ValidationError::new(
            "logging.level",
            format!("'{}' is not a valid filter directive", config.logging.level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
