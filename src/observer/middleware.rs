//! The request observer and its axum middleware function.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use chrono::Local;

use crate::config::ObserverConfig;
use crate::observer::capture::{buffer_request, captured_body, is_json, response_size};
use crate::observer::client_ip::client_ip;
use crate::observer::errors::HandlerErrors;
use crate::observer::hostname::resolve_hostname;
use crate::observer::record::{normalize_size, render_start_time, AccessRecord};
use crate::observer::sink::RecordSink;

/// Immutable observer state shared by every request.
pub struct RequestObserver {
    config: ObserverConfig,
    excluded_paths: HashSet<String>,
    hostname: String,
    sink: Arc<dyn RecordSink>,
}

impl RequestObserver {
    /// Build an observer. The hostname is resolved here, once.
    pub fn build(config: ObserverConfig, sink: Arc<dyn RecordSink>) -> Self {
        let excluded_paths = config.excluded_paths.iter().cloned().collect();
        let hostname = resolve_hostname(config.hostname.as_deref());

        if !config.time_format.is_valid() {
            tracing::warn!(
                time_format = ?config.time_format,
                "Invalid time format, start times will be recorded empty"
            );
        }

        tracing::debug!(
            hostname = %hostname,
            excluded_paths = ?config.excluded_paths,
            capture_body = config.capture_body,
            body_size_limit = config.body_size_limit,
            "Request observer built"
        );

        Self {
            config,
            excluded_paths,
            hostname,
            sink,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Exact-match check against the excluded path set.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.excluded_paths.contains(path)
    }
}

/// Middleware emitting one access record per handled request.
///
/// Install with `axum::middleware::from_fn_with_state(observer, observe_request)`.
/// The response is returned exactly as the inner chain produced it.
pub async fn observe_request(
    State(observer): State<Arc<RequestObserver>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    if observer.is_excluded(&path) {
        return next.run(request).await;
    }

    let config = &observer.config;
    let raw_query = request.uri().query().unwrap_or_default().to_string();
    let method = request.method().to_string();
    let user_agent = header_text(request.headers(), &header::USER_AGENT);
    let referer = header_text(request.headers(), &header::REFERER);
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client_ip = client_ip(request.headers(), peer, config.trust_forwarded_headers);

    let started_at = Local::now();
    let start = Instant::now();

    let (request, buffered) = if config.capture_body && is_json(request.headers()) {
        buffer_request(request, config.max_buffered_body).await
    } else {
        (request, None)
    };

    let response = next.run(request).await;

    let latency = start.elapsed();
    let size = normalize_size(response_size(&response));
    let error = response
        .extensions()
        .get::<HandlerErrors>()
        .map(HandlerErrors::private_description)
        .unwrap_or_default();

    let record = AccessRecord {
        hostname: observer.hostname.clone(),
        time: render_start_time(started_at, &config.time_format, config.utc),
        status_code: response.status().as_u16(),
        latency,
        client_ip,
        method,
        path,
        raw_query,
        referer,
        user_agent,
        request_body_size: size,
        request_body: captured_body(buffered.as_ref(), size, config),
        error,
    };
    observer.sink.emit(&record);

    response
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
