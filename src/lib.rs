//! Vehicle-service booking API.
//!
//! Bookings, inventory, staff, suppliers and customer issues behind a
//! tiered admission gate, with allow-list sanitizing of every input and
//! allow-list shaping of every output.

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod mail;
pub mod observability;
pub mod records;
pub mod routes;
pub mod security;
pub mod store;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
