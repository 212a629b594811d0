//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::security::rate_limit::Tier;

/// Root configuration for the booking service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request hardening settings.
    pub security: SecurityConfig,

    /// Rate limiting configuration, including the tier table.
    pub rate_limit: RateLimitConfig,

    /// Inventory rules.
    pub inventory: InventoryConfig,

    /// Outbound notification mail.
    pub mail: MailConfig,

    /// Admin dashboard access.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,

    /// Use the first `X-Forwarded-For` hop as the client key.
    /// Only enable behind a proxy that overwrites the header.
    pub trust_forwarded_for: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
            trust_forwarded_for: false,
        }
    }
}

/// Quota for a single tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierLimit {
    /// Requests admitted per window.
    pub max_requests: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl TierLimit {
    pub const fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
        }
    }

    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

/// The one table every route consults for its quota.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TierTable {
    pub read: TierLimit,
    pub write: TierLimit,
    pub admin: TierLimit,
    pub auth: TierLimit,
}

impl TierTable {
    pub fn limit(&self, tier: Tier) -> TierLimit {
        match tier {
            Tier::Read => self.read,
            Tier::Write => self.write,
            Tier::Admin => self.admin,
            Tier::Auth => self.auth,
        }
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            read: TierLimit::new(60, 15 * 60),
            write: TierLimit::new(20, 15 * 60),
            admin: TierLimit::new(30, 15 * 60),
            auth: TierLimit::new(5, 15 * 60),
        }
    }
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,

    /// How often expired buckets are reclaimed, in seconds.
    pub sweep_interval_secs: u64,

    /// Per-tier quotas.
    pub tiers: TierTable,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sweep_interval_secs: 60,
            tiers: TierTable::default(),
        }
    }
}

/// Inventory rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct InventoryConfig {
    /// A low-stock notification goes out when total units fall below this.
    pub low_stock_threshold: u64,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
        }
    }
}

/// Notification mail configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    /// Send through the HTTP mail API. When false, messages are only logged.
    pub enabled: bool,

    /// Mail API endpoint accepting a JSON message.
    pub endpoint: String,

    /// Bearer credential for the mail API.
    pub api_key: String,

    /// Sender address.
    pub from: String,

    /// Recipient of stock notifications.
    pub to: String,

    /// Mail API request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            api_key: String::new(),
            from: "no-reply@servicebay.local".to_string(),
            to: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Admin dashboard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// API key for authentication (Bearer token).
    pub api_key: String,
}

/// Shipped default for `admin.api_key`; never valid in production.
pub const PLACEHOLDER_ADMIN_KEY: &str = "CHANGE_ME_IN_PRODUCTION";

impl AdminConfig {
    pub fn uses_placeholder_key(&self) -> bool {
        self.api_key == PLACEHOLDER_ADMIN_KEY
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_key: PLACEHOLDER_ADMIN_KEY.to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins when set.
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
