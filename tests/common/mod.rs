//! Shared utilities for integration tests.

use std::sync::Arc;

use axum::body::Body;
use request_observer::config::ObserverConfig;
use request_observer::observer::{MemorySink, RequestObserver};

/// Build an observer that records into a fresh in-memory sink.
#[allow(dead_code)]
pub fn memory_observer(config: ObserverConfig) -> (Arc<RequestObserver>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let observer = Arc::new(RequestObserver::build(config, sink.clone()));
    (observer, sink)
}

/// Observer config with a fixed hostname so records are deterministic.
#[allow(dead_code)]
pub fn test_config() -> ObserverConfig {
    ObserverConfig {
        hostname: Some("test-host".into()),
        ..ObserverConfig::default()
    }
}

/// Collect a body into a string.
#[allow(dead_code)]
pub async fn body_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
