//! End-to-end tests against the host server over a real socket.

use std::net::SocketAddr;
use std::sync::Arc;

use request_observer::config::ServerConfig;
use request_observer::observer::MemorySink;
use request_observer::{HttpServer, Shutdown};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

mod common;

async fn start_server(mut config: ServerConfig) -> (SocketAddr, Arc<MemorySink>, Shutdown, JoinHandle<()>) {
    config.listener.bind_address = "127.0.0.1:0".into();
    config.observer.hostname = Some("e2e-host".into());

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let sink = Arc::new(MemorySink::new());
    let server = HttpServer::new(config, sink.clone());
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move {
        server.run(listener, server_shutdown).await.unwrap();
    });

    (addr, sink, shutdown, handle)
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_post_users_logged_with_peer_address() {
    let (addr, sink, shutdown, handle) = start_server(ServerConfig::default()).await;

    let res = client()
        .post(format!("http://{}/users?source=e2e", addr))
        .header("user-agent", "e2e-client")
        .json(&json!({ "name": "a" }))
        .send()
        .await
        .expect("server unreachable");

    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "id": 1, "user": { "name": "a" } }));

    let records = sink.records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.hostname, "e2e-host");
    assert_eq!(record.status_code, 201);
    assert_eq!(record.client_ip, "127.0.0.1");
    assert_eq!(record.raw_query, "source=e2e");
    assert_eq!(record.user_agent, "e2e-client");
    assert_eq!(record.request_body, r#"{"name":"a"}"#);
    assert_eq!(record.request_body_size, body.to_string().len() as u64);

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_excluded_health_and_failing_route() {
    let mut config = ServerConfig::default();
    config.observer.excluded_paths = vec!["/health".into()];
    let (addr, sink, shutdown, handle) = start_server(config).await;
    let client = client();

    let res = client.get(format!("http://{}/health", addr)).send().await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "OK");
    assert!(sink.is_empty());

    let res = client.get(format!("http://{}/fail", addr)).send().await.unwrap();
    assert_eq!(res.status(), 500);
    assert_eq!(res.text().await.unwrap(), "internal error");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].path, "/fail");
    assert_eq!(records[0].error, "Error #01: upstream dependency unavailable\n");
    assert_eq!(records[0].request_body_size, "internal error".len() as u64);

    shutdown.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_router_serves_without_socket() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let sink = Arc::new(MemorySink::new());
    let server = HttpServer::new(ServerConfig::default(), sink.clone());

    let response = server
        .router()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(common::body_string(response.into_body()).await, "OK");

    let records = sink.records();
    assert_eq!(records.len(), 1);
    // No ConnectInfo without a socket.
    assert_eq!(records[0].client_ip, "");
    assert_eq!(records[0].hostname, server.observer().hostname());
}
