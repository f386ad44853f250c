//! Request observer subsystem.
//!
//! # Data Flow
//! ```text
//! request
//!     → middleware.rs (excluded? start clock, buffer JSON body)
//!     → inner handler chain (runs to completion)
//!     → capture.rs (response size, body capture policy)
//!     → record.rs (AccessRecord)
//!     → sink.rs (exactly one emit)
//!     → response, unchanged
//! ```
//!
//! # Design Decisions
//! - All settings live on an immutable `RequestObserver` shared via `Arc`
//! - Excluded paths are an exact-match set
//! - Nothing the observer does can fail the request

mod capture;
pub mod client_ip;
pub mod errors;
pub mod hostname;
pub mod middleware;
pub mod record;
pub mod sink;

pub use errors::{ErrorKind, HandlerError, HandlerErrors};
pub use hostname::{resolve_hostname, UNKNOWN_HOSTNAME};
pub use middleware::{observe_request, RequestObserver};
pub use record::AccessRecord;
pub use sink::{MemorySink, RecordSink, TracingSink, ACCESS_TARGET};
