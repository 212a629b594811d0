//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (request ID, trace span, timeout, body limit)
//!     → admission gate for the route group
//!     → routes / admin handlers
//!     → error.rs (failures normalized to {"error": ...})
//!     → Send to client
//! ```

pub mod error;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use server::{AppState, HttpServer};
