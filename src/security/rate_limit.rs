//! Admission gate: fixed-window rate limiting per (client, tier).
//!
//! Every route group is bound to a [`TierSelector`]; quotas come from the
//! single [`TierTable`] in config and can be swapped at runtime.

use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use axum::{
    body::Body,
    extract::{connect_info::MockConnectInfo, ConnectInfo, FromRequestParts, State},
    http::{request::Parts, Extensions, HeaderMap, HeaderName, HeaderValue, Method, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::TierTable;
use crate::http::error::ApiError;
use crate::observability::metrics;
use crate::security::clock::{Clock, SystemClock};

pub const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
pub const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
pub const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// A named rate-limit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Read,
    Write,
    Admin,
    Auth,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Read, Tier::Write, Tier::Admin, Tier::Auth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Read => "read",
            Tier::Write => "write",
            Tier::Admin => "admin",
            Tier::Auth => "auth",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Counting state for one (client, tier) pair.
#[derive(Debug, Clone, Copy)]
struct Bucket {
    window_start: Instant,
    count: u32,
}

/// Outcome of a single admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Time left in the current window, measured at check time.
    pub reset_after: Duration,
}

impl Decision {
    /// Seconds until the window resets, rounded up, never zero.
    pub fn reset_secs(&self) -> u64 {
        let secs = self.reset_after.as_secs();
        let rounded = if self.reset_after.subsec_nanos() > 0 {
            secs + 1
        } else {
            secs
        };
        rounded.max(1)
    }

    /// Write the `RateLimit-*` headers for this decision.
    pub fn apply_headers(&self, headers: &mut HeaderMap) {
        headers.insert(RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
        headers.insert(RATELIMIT_RESET, HeaderValue::from(self.reset_secs()));
    }
}

/// Owns every bucket and the active tier table.
pub struct AdmissionGate {
    buckets: DashMap<(String, Tier), Bucket>,
    tiers: ArcSwap<TierTable>,
    clock: Arc<dyn Clock>,
}

impl AdmissionGate {
    pub fn new(tiers: TierTable) -> Self {
        Self::with_clock(tiers, Arc::new(SystemClock))
    }

    pub fn with_clock(tiers: TierTable, clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: DashMap::new(),
            tiers: ArcSwap::from_pointee(tiers),
            clock,
        }
    }

    /// Count a request from `client_key` against `tier`.
    ///
    /// The read-reset-increment sequence runs under the bucket's shard lock,
    /// so concurrent checks for the same key never over-admit. Denied checks
    /// leave the count at the limit.
    pub fn check(&self, client_key: &str, tier: Tier) -> Decision {
        let limit = self.tiers.load().limit(tier);
        let window = limit.window();
        let now = self.clock.now();

        let mut bucket = self
            .buckets
            .entry((client_key.to_owned(), tier))
            .or_insert(Bucket {
                window_start: now,
                count: 0,
            });

        if now.duration_since(bucket.window_start) >= window {
            bucket.window_start = now;
            bucket.count = 0;
        }

        let reset_after = window.saturating_sub(now.duration_since(bucket.window_start));

        if bucket.count >= limit.max_requests {
            return Decision {
                allowed: false,
                limit: limit.max_requests,
                remaining: 0,
                reset_after,
            };
        }

        bucket.count += 1;
        Decision {
            allowed: true,
            limit: limit.max_requests,
            remaining: limit.max_requests - bucket.count,
            reset_after,
        }
    }

    /// Drop buckets whose window has closed. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let tiers = self.tiers.load();
        let now = self.clock.now();
        let before = self.buckets.len();

        self.buckets.retain(|(_, tier), bucket| {
            now.duration_since(bucket.window_start) < tiers.limit(*tier).window()
        });

        let remaining = self.buckets.len();
        metrics::record_bucket_count(remaining);
        before.saturating_sub(remaining)
    }

    /// Replace the tier table. Existing buckets keep their counts.
    pub fn update_tiers(&self, tiers: TierTable) {
        self.tiers.store(Arc::new(tiers));
    }

    pub fn tiers(&self) -> Arc<TierTable> {
        self.tiers.load_full()
    }

    /// Number of live buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

/// Periodically reclaim expired buckets until shutdown.
pub fn spawn_sweeper(
    gate: Arc<AdmissionGate>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = gate.sweep();
                    if removed > 0 {
                        tracing::debug!(removed, live = gate.bucket_count(), "Reclaimed rate limit buckets");
                    }
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Bucket sweeper stopping");
                    break;
                }
            }
        }
    })
}

/// How a route group picks its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TierSelector {
    Fixed(Tier),
    /// Safe methods are reads, everything else is a write.
    ByMethod,
}

impl TierSelector {
    pub fn resolve(&self, method: &Method) -> Tier {
        match self {
            TierSelector::Fixed(tier) => *tier,
            TierSelector::ByMethod => {
                if method == Method::GET || method == Method::HEAD || method == Method::OPTIONS {
                    Tier::Read
                } else {
                    Tier::Write
                }
            }
        }
    }
}

/// Middleware state binding a route group to the shared gate.
#[derive(Clone)]
pub struct Admission {
    pub gate: Arc<AdmissionGate>,
    pub selector: TierSelector,
    pub enabled: bool,
    pub trust_forwarded_for: bool,
}

/// Derive the bucket key for a request.
pub fn client_key(request: &Request<Body>, trust_forwarded_for: bool) -> String {
    if trust_forwarded_for {
        let forwarded = request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());
        if let Some(ip) = forwarded {
            return ip.to_string();
        }
    }
    peer_ip(request.extensions())
}

/// Peer address from the serving socket, or from `MockConnectInfo` when the
/// router is driven without one.
fn peer_ip(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
        .or_else(|| {
            extensions
                .get::<MockConnectInfo<SocketAddr>>()
                .map(|MockConnectInfo(addr)| *addr)
        })
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// The client identity the gate counted this request under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientKey(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ClientKey {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<ClientKey>()
            .cloned()
            .unwrap_or_else(|| ClientKey(peer_ip(&parts.extensions))))
    }
}

/// Middleware enforcing the tier quota for the route group.
pub async fn admission_middleware(
    State(admission): State<Admission>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let key = client_key(&request, admission.trust_forwarded_for);
    request.extensions_mut().insert(ClientKey(key.clone()));

    if !admission.enabled {
        return next.run(request).await;
    }

    let tier = admission.selector.resolve(request.method());
    let decision = admission.gate.check(&key, tier);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        tracing::warn!(client = %key, tier = %tier, retry_after_secs = decision.reset_secs(), "Rate limit exceeded");
        metrics::record_rate_limited(tier.as_str());
        ApiError::RateLimited {
            retry_after_secs: decision.reset_secs(),
        }
        .into_response()
    };

    decision.apply_headers(response.headers_mut());
    response
}
