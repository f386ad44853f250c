//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the demonstration handlers
//! - Wire up middleware (request observer outermost, timeout inside it)
//! - Bind server to listener with peer address info
//! - Graceful shutdown on the lifecycle broadcast

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::observer::{observe_request, RecordSink, RequestObserver};

/// HTTP server hosting the request observer.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
    observer: Arc<RequestObserver>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration and record sink.
    pub fn new(config: ServerConfig, sink: Arc<dyn RecordSink>) -> Self {
        let observer = Arc::new(RequestObserver::build(config.observer.clone(), sink));
        let router = Self::build_router(&config, observer.clone());
        Self {
            router,
            config,
            observer,
        }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The observer wraps the timeout so timed-out requests are still logged.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, observer: Arc<RequestObserver>) -> Router {
        Router::new()
            .route("/health", get(handlers::health))
            .route("/users", post(handlers::create_user))
            .route("/fail", get(handlers::fail))
            .layer(
                ServiceBuilder::new()
                    .layer(middleware::from_fn_with_state(observer, observe_request))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server until the shutdown receiver fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            hostname = %self.observer.hostname(),
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// A clone of the fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn observer(&self) -> &Arc<RequestObserver> {
        &self.observer
    }
}
