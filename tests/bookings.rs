//! Booking routes: allow-listed input and output, error bodies.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};

use servicebay::http::HttpServer;

mod common;
use common::*;

fn server() -> HttpServer {
    HttpServer::new(test_config(), mailer())
}

#[tokio::test]
async fn create_drops_unknown_fields_and_hides_internal_ones() {
    let server = server();
    let app = app(&server, "198.51.100.7");

    let mut body = booking_body();
    body["isAdmin"] = json!(true);
    body["status"] = json!("completed");
    body["reviewed"] = json!(true);

    let res = send(&app, post_json("/booking", &body)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created = json_body(res).await;

    assert!(created.get("isAdmin").is_none());
    assert!(created.get("sourceAddress").is_none());
    assert!(created.get("reviewed").is_none());
    assert_eq!(created["status"], "pending");
    assert_eq!(created["customerName"], "Nimal Perera");

    let id = created["id"].as_str().unwrap();
    let stored = server.state().store.bookings.get(&id.parse().unwrap()).unwrap();
    assert_eq!(stored.source_address, "198.51.100.7");
    assert!(!stored.reviewed);

    let fetched = json_body(send(&app, get(&format!("/booking/{id}"))).await).await;
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn list_returns_public_views_in_creation_order() {
    let server = server();
    let app = app(&server, "198.51.100.8");

    for name in ["First", "Second", "Third"] {
        let mut body = booking_body();
        body["customerName"] = json!(name);
        send(&app, post_json("/booking", &body)).await;
    }

    let res = send(&app, get("/booking")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let list = json_body(res).await;
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["customerName"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["First", "Second", "Third"]);
    assert!(list[0].get("sourceAddress").is_none());
}

#[tokio::test]
async fn invalid_fields_return_400_with_error_body() {
    let server = server();
    let app = app(&server, "198.51.100.9");

    let mut body = booking_body();
    body["email"] = json!("not-an-email");
    let res = send(&app, post_json("/booking", &body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(res).await,
        json!({ "error": "invalid field email: must be a valid email address" })
    );

    let mut body = booking_body();
    body["date"] = json!("2001-01-01");
    let res = send(&app, post_json("/booking", &body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(res).await["error"],
        "invalid field date: must not be in the past"
    );

    let mut body = booking_body();
    body.as_object_mut().unwrap().remove("vehicleNumber");
    let res = send(&app, post_json("/booking", &body)).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error = json_body(res).await;
    assert!(error["error"].as_str().unwrap().contains("vehicleNumber"));

    assert!(server.state().store.bookings.is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let server = server();
    let app = app(&server, "198.51.100.10");

    let request = Request::builder()
        .method("POST")
        .uri("/booking")
        .header("content-type", "application/json")
        .body(Body::from("{\"customerName\": "))
        .unwrap();
    let res = send(&app, request).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await, json!({ "error": "Malformed JSON body" }));
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let server = server();
    let app = app(&server, "198.51.100.11");

    let missing = uuid::Uuid::new_v4();
    let res = send(&app, get(&format!("/booking/{missing}"))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await, json!({ "error": "Booking not found" }));

    let res = send(&app, get("/booking/42")).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await, json!({ "error": "invalid id" }));
}

#[tokio::test]
async fn update_and_delete() {
    let server = server();
    let app = app(&server, "198.51.100.12");

    let created = json_body(send(&app, post_json("/booking", &booking_body())).await).await;
    let id = created["id"].as_str().unwrap().to_string();

    let mut changed = booking_body();
    changed["time"] = json!("14:45");
    changed["notes"] = json!("Check brake pads");
    let res = send(&app, put_json(&format!("/booking/{id}"), &changed)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = json_body(res).await;
    assert_eq!(updated["time"], "14:45");
    assert_eq!(updated["notes"], "Check brake pads");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/booking/{id}"))
        .body(Body::empty())
        .unwrap();
    let res = send(&app, delete).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_body(res).await, json!({ "success": "Booking deleted" }));

    let res = send(&app, get(&format!("/booking/{id}"))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn issues_accept_optional_booking_reference() {
    let server = server();
    let app = app(&server, "198.51.100.13");

    let body = json!({
        "title": "Scratch on door",
        "description": "Noticed after pickup",
        "email": "nimal@example.com",
        "triageNote": "ignore",
    });
    let res = send(&app, post_json("/issue", &body)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let issue: Value = json_body(res).await;
    assert_eq!(issue["status"], "open");
    assert_eq!(issue["bookingId"], Value::Null);
    assert!(issue.get("triageNote").is_none());
}

#[tokio::test]
async fn routing_failures_use_the_error_body() {
    let server = server();
    let app = app(&server, "198.51.100.14");

    let res = send(&app, put_json("/inventory", &inventory_body("Oil filter", 1))).await;
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(json_body(res).await, json!({ "error": "Method not allowed" }));

    let res = send(&app, get("/bookings/nowhere")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(res).await, json!({ "error": "Route not found" }));
}

#[tokio::test]
async fn oversized_body_is_413() {
    let server = server();
    let app = app(&server, "198.51.100.15");

    let mut body = booking_body();
    body["notes"] = json!("x".repeat(70 * 1024));
    let res = send(&app, post_json("/booking", &body)).await;
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(json_body(res).await, json!({ "error": "Request body too large" }));
    assert!(server.state().store.bookings.is_empty());
}
