//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Server lifecycle + RequestObserver (via TracingSink)
//!     → logging.rs (subscriber, filter, format)
//!     → stdout
//! ```

pub mod logging;
