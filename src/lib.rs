//! HTTP request observer: one structured access record per handled request.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod observer;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observer::{observe_request, AccessRecord, RecordSink, RequestObserver};
