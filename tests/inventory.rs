//! Inventory routes and the low-stock notification.

use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::json;

use servicebay::http::HttpServer;

mod common;
use common::*;

async fn stock(app: &axum::Router, items: &[(&str, u32)]) {
    for (name, quantity) in items {
        let res = send(app, post_json("/inventory", &inventory_body(name, *quantity))).await;
        assert_eq!(res.status(), StatusCode::CREATED);
    }
}

#[tokio::test]
async fn below_threshold_sends_exactly_one_notification() {
    let mailer = mailer();
    let server = HttpServer::new(test_config(), mailer.clone());
    let app = app(&server, "192.0.2.60");

    stock(&app, &[("Oil filter", 5), ("Brake pad", 3)]).await;

    let res = send(&app, post_json("/inventory/sendmail", &json!({}))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        json_body(res).await,
        json!({ "success": "Low stock notification sent", "totalUnits": 8, "threshold": 10 })
    );

    assert_eq!(mailer.count(), 1);
    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent[0].to, "manager@garage.test");
    assert!(sent[0].text.contains("Oil filter"));
    assert!(sent[0].text.contains("(8)"));
}

#[tokio::test]
async fn at_or_above_threshold_sends_nothing() {
    let mailer = mailer();
    let server = HttpServer::new(test_config(), mailer.clone());
    let app = app(&server, "192.0.2.61");

    stock(&app, &[("Oil filter", 7), ("Brake pad", 5)]).await;

    let res = send(&app, post_json("/inventory/sendmail", &json!({}))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        json_body(res).await,
        json!({ "success": "Inventory level is sufficient", "totalUnits": 12, "threshold": 10 })
    );
    assert_eq!(mailer.count(), 0);
}

#[tokio::test]
async fn mail_failure_is_a_generic_500() {
    let server = HttpServer::new(test_config(), Arc::new(RecordingMailer::failing()));
    let app = app(&server, "192.0.2.62");

    stock(&app, &[("Spark plug", 2)]).await;

    let res = send(&app, post_json("/inventory/sendmail", &json!({}))).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(res).await, json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn threshold_comes_from_config() {
    let mut config = test_config();
    config.inventory.low_stock_threshold = 3;
    let mailer = mailer();
    let server = HttpServer::new(config, mailer.clone());
    let app = app(&server, "192.0.2.63");

    stock(&app, &[("Coolant", 4)]).await;

    let body = json_body(send(&app, post_json("/inventory/sendmail", &json!({}))).await).await;
    assert_eq!(body["threshold"], 3);
    assert_eq!(mailer.count(), 0);
}

#[tokio::test]
async fn crud_hides_last_modified_by() {
    let server = HttpServer::new(test_config(), mailer());
    let app = app(&server, "192.0.2.64");

    let res = send(&app, post_json("/inventory", &inventory_body("Air filter", 9))).await;
    let item = json_body(res).await;
    assert!(item.get("lastModifiedBy").is_none());
    assert_eq!(item["unitPrice"], 1250.0);

    let id = item["id"].as_str().unwrap();
    let res = send(&app, put_json(&format!("/inventory/{id}"), &inventory_body("Air filter", 2))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await["quantity"], 2);

    let res = send(&app, post_json("/inventory", &json!({ "name": "Bolt", "quantity": -1 }))).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}
