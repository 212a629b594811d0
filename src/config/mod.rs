//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared with the HTTP server and the admission gate
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → server swaps the new tier table into the admission gate
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Rate limit tiers live in exactly one table (`TierTable`)
//! - Only the tier table is hot-swappable; other changes need a restart

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    AdminConfig, InventoryConfig, ListenerConfig, MailConfig, ObservabilityConfig,
    RateLimitConfig, SecurityConfig, ServiceConfig, TierLimit, TierTable, TimeoutConfig,
};
pub use watcher::ConfigWatcher;
