//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → rate_limit.rs (admission gate, per client + tier)
//!     → handler
//!         → projection.rs (sanitize body against the input allow-list)
//!         → store
//!         → projection.rs (project record against the public allow-list)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - Allow-lists only; there is no blocklist anywhere
//! - Bucket state is owned by the gate instance, never global

pub mod clock;
pub mod projection;
pub mod rate_limit;

pub use projection::{pick, project, project_all, sanitize, FieldSpec};
pub use rate_limit::{Admission, AdmissionGate, ClientKey, Decision, Tier, TierSelector};
