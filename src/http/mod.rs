//! HTTP hosting subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, ConnectInfo)
//!     → observer middleware
//!     → timeout layer
//!     → handlers.rs
//! ```

pub mod handlers;
pub mod server;

pub use server::HttpServer;
