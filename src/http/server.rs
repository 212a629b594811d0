//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with every route group
//! - Bind each route group to its rate-limit tier
//! - Wire up middleware (request ID, tracing, timeout, body limit, metrics)
//! - Run the bucket sweeper and apply tier reloads
//! - Serve until shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{header, Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::ServiceConfig;
use crate::http::error::ApiError;
use crate::mail::Mailer;
use crate::observability::metrics;
use crate::routes;
use crate::security::rate_limit::{
    admission_middleware, spawn_sweeper, Admission, AdmissionGate, Tier, TierSelector,
};
use crate::store::Store;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub gate: Arc<AdmissionGate>,
    pub mailer: Arc<dyn Mailer>,
    pub config: Arc<ServiceConfig>,
    pub started_at: Instant,
}

/// HTTP server for the booking API.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig, mailer: Arc<dyn Mailer>) -> Self {
        let gate = Arc::new(AdmissionGate::new(config.rate_limit.tiers.clone()));
        Self::with_gate(config, mailer, gate)
    }

    /// Create a server around an existing gate (e.g. one driven by a test clock).
    pub fn with_gate(config: ServiceConfig, mailer: Arc<dyn Mailer>, gate: Arc<AdmissionGate>) -> Self {
        let state = AppState {
            store: Arc::new(Store::new()),
            gate,
            mailer,
            config: Arc::new(config),
            started_at: Instant::now(),
        };
        let router = Self::build_router(&state);
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: &AppState) -> Router {
        let config = &state.config;
        let admission = |selector| Admission {
            gate: state.gate.clone(),
            selector,
            enabled: config.rate_limit.enabled,
            trust_forwarded_for: config.security.trust_forwarded_for,
        };

        let api = routes::api_router().layer(middleware::from_fn_with_state(
            admission(TierSelector::ByMethod),
            admission_middleware,
        ));
        let auth = routes::auth::router().layer(middleware::from_fn_with_state(
            admission(TierSelector::Fixed(Tier::Auth)),
            admission_middleware,
        ));
        let admin = admin::router(state.clone()).layer(middleware::from_fn_with_state(
            admission(TierSelector::Fixed(Tier::Admin)),
            admission_middleware,
        ));

        Router::new()
            .route("/health", get(health))
            .merge(api)
            .merge(auth)
            .merge(admin)
            .method_not_allowed_fallback(method_not_allowed)
            .fallback(not_found)
            .with_state(state.clone())
            .layer(DefaultBodyLimit::max(config.security.max_body_size))
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(config.timeouts.request_secs),
            ))
            .layer(middleware::map_response(timeout_body))
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("-");
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id,
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Tier tables arriving on `config_updates` are swapped into the gate.
    /// The server drains and returns once `shutdown` fires (or its sender
    /// is dropped).
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let config = self.state.config.clone();
        tracing::info!(
            address = %addr,
            rate_limit_enabled = config.rate_limit.enabled,
            "HTTP server starting"
        );

        if config.rate_limit.enabled {
            spawn_sweeper(
                self.state.gate.clone(),
                Duration::from_secs(config.rate_limit.sweep_interval_secs),
                shutdown.resubscribe(),
            );
        }

        let gate = self.state.gate.clone();
        tokio::spawn(async move {
            while let Some(new_config) = config_updates.recv().await {
                tracing::info!(tiers = ?new_config.rate_limit.tiers, "Rate limit tiers reloaded");
                gate.update_tiers(new_config.rate_limit.tiers);
            }
        });

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> ApiError {
    ApiError::NotFound("Route")
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Give the bare 408 from the timeout layer the usual error body.
async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT
        && !response.headers().contains_key(header::CONTENT_TYPE)
    {
        return ApiError::Timeout.into_response();
    }
    response
}
