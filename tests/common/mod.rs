//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    extract::connect_info::MockConnectInfo,
    http::{Request, Response},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tower::ServiceExt;

use servicebay::config::ServiceConfig;
use servicebay::http::HttpServer;
use servicebay::lifecycle::Shutdown;
use servicebay::mail::{MailError, MailMessage, Mailer};

pub const ADMIN_KEY: &str = "test-admin-key";

/// Captures messages instead of sending them.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<MailMessage>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            fail: true,
        }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if self.fail {
            return Err(MailError::Rejected(503));
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.admin.api_key = ADMIN_KEY.into();
    config.mail.to = "manager@garage.test".into();
    config
}

/// Router with a fixed peer address, driven without a socket.
pub fn app(server: &HttpServer, peer: &str) -> Router {
    let addr: SocketAddr = format!("{peer}:40000").parse().unwrap();
    server.router().layer(MockConnectInfo(addr))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn put_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn booking_body() -> Value {
    let date = (chrono::Utc::now() + chrono::Duration::days(7)).date_naive();
    serde_json::json!({
        "customerName": "Nimal Perera",
        "email": "nimal@example.com",
        "phone": "0771234567",
        "vehicleNumber": "CAB-1234",
        "vehicleModel": "Toyota Axio",
        "serviceType": "Full service",
        "date": date.to_string(),
        "time": "10:15",
    })
}

pub fn inventory_body(name: &str, quantity: u32) -> Value {
    serde_json::json!({
        "name": name,
        "category": "Engine",
        "quantity": quantity,
        "unitPrice": 1250.0,
        "supplier": "Lanka Auto Parts",
    })
}

/// Start a real server on an ephemeral port.
pub async fn spawn_server(server: HttpServer) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let (_, config_updates) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, config_updates, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn mailer() -> Arc<RecordingMailer> {
    Arc::new(RecordingMailer::default())
}
