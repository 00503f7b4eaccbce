//! # HTTP API Tests
//!
//! Drive the router in-process with `tower::ServiceExt::oneshot`.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use pavers::server::{AppState, ServerConfig, router};

const TOKEN: &str = "form-token";
const BOUNDARY: &str = "paverboundary";

fn app() -> Router {
    let config = ServerConfig {
        consent_token: TOKEN.to_string(),
        max_upload_bytes: 1024,
        ..Default::default()
    };
    router(Arc::new(AppState::new(config).unwrap()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_file(filename: &str, content_type: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"graphic\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/api/graphics")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn six_lines() -> Value {
    json!(["in memory of", "jane doe", "1950-2020", "beloved", "mother", "& friend"])
}

#[tokio::test]
async fn rule_shape_follows_toggles() {
    let app = app();

    let (status, body) = send(&app, get("/api/rules/paver-12x12")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["effective_columns"], 15);
    assert_eq!(body["lines"], 6);

    let (_, body) = send(&app, get("/api/rules/paver-12x12?cross=true")).await;
    assert_eq!(body["effective_columns"], 12);

    // No cross on the small paver: the toggle is ignored.
    let (_, body) = send(&app, get("/api/rules/paver-4x8?cross=true")).await;
    assert_eq!(body["effective_columns"], 15);
    assert_eq!(body["flags"]["cross_selected"], false);

    let (status, _) = send(&app, get("/api/rules/gift-card")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, get("/api/rules")).await;
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn accepted_personalization_lands_in_cart() {
    let app = app();
    let request = json!({
        "product": "paver-4x8",
        "lines": ["john smith", "1950-2020", "rest easy"],
        "alignment": "left",
        "consent_token": TOKEN,
    });

    let (status, body) = send(&app, post_json("/api/carts/c1/personalize", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["personalized"], true);
    assert_eq!(body["line"], 0);
    assert_eq!(
        body["lines"][0]["personalization"]["lines"],
        json!(["JOHN SMITH", "1950-2020", "REST EASY"])
    );
    assert_eq!(body["graphic_fee"], "0.00");

    let (status, body) = send(&app, get("/api/carts/c1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn identical_submissions_get_separate_lines() {
    let app = app();
    let request = json!({
        "product": "paver-4x8",
        "lines": ["A", "B", "C"],
        "consent_token": TOKEN,
    });
    send(&app, post_json("/api/carts/c2/personalize", request.clone())).await;
    let (_, body) = send(&app, post_json("/api/carts/c2/personalize", request)).await;

    assert_eq!(body["line"], 1);
    let lines = body["lines"].as_array().unwrap();
    assert_ne!(
        lines[0]["personalization"]["token"],
        lines[1]["personalization"]["token"]
    );
}

#[tokio::test]
async fn refused_submissions_leave_cart_untouched() {
    let app = app();

    let forged = json!({
        "product": "paver-4x8",
        "lines": ["A", "B", "C"],
        "consent_token": "forged",
    });
    let (status, body) = send(&app, post_json("/api/carts/c3/personalize", forged)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);

    let short = json!({
        "product": "paver-4x8",
        "lines": ["A", "B"],
        "consent_token": TOKEN,
    });
    let (status, body) = send(&app, post_json("/api/carts/c3/personalize", short)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["line"], 3);

    let (status, _) = send(&app, get("/api/carts/c3")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_product_is_added_without_personalization() {
    let app = app();
    let request = json!({"product": "gift-card", "consent_token": TOKEN, "quantity": 2});
    let (status, body) = send(&app, post_json("/api/carts/c4/personalize", request)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["personalized"], false);
    assert_eq!(body["lines"][0]["quantity"], 2);
}

#[tokio::test]
async fn graphic_fee_and_checkout() {
    let app = app();

    let (status, graphic) = send(&app, post_file("logo.png", "image/png", b"\x89PNG fake")).await;
    assert_eq!(status, StatusCode::OK);
    let id = graphic["id"].as_str().unwrap().to_string();
    assert_eq!(graphic["url"], format!("/api/graphics/{id}"));

    let with_graphic = json!({
        "product": "paver-12x12",
        "lines": six_lines(),
        "consent_token": TOKEN,
        "graphic_id": id,
        "quantity": 2,
    });
    let (status, body) = send(&app, post_json("/api/carts/c5/personalize", with_graphic)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"][0]["personalization"]["effective_columns"], 12);

    let plain = json!({
        "product": "paver-12x12",
        "lines": six_lines(),
        "consent_token": TOKEN,
    });
    let (_, body) = send(&app, post_json("/api/carts/c5/personalize", plain)).await;
    assert_eq!(body["graphic_fee"], "50.00");

    let (status, order) = send(&app, post_json("/api/carts/c5/checkout", json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["graphic_fee"], "50.00");
    let facts = order["lines"][0]["facts"].as_array().unwrap();
    assert_eq!(facts[0]["value"], "IN MEMORY OF\nJANE DOE\n1950-2020\nBELOVED\nMOTHER\n& FRIEND");
    assert!(facts.iter().any(|f| f["label"] == "Graphic"));

    let order_id = order["id"].as_str().unwrap();
    let (status, stored) = send(&app, get(&format!("/api/orders/{order_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, order);

    // The cart was consumed by checkout.
    let (status, _) = send(&app, post_json("/api/carts/c5/checkout", json!({}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn upload_rejections() {
    let app = app();

    let (status, body) = send(&app, post_file("notes.html", "text/html", b"<p>hi</p>")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("text/html"));

    let big = vec![0u8; 2048];
    let (status, body) = send(&app, post_file("big.png", "image/png", &big)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("too large"));
}

#[tokio::test]
async fn missing_graphic_keeps_validated_lines() {
    let app = app();
    let request = json!({
        "product": "paver-12x12",
        "lines": six_lines(),
        "consent_token": TOKEN,
        "graphic_id": "00000000-0000-0000-0000-000000000000",
    });
    let (status, body) = send(&app, post_json("/api/carts/c6/personalize", request)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["retained_lines"][1], "JANE DOE");
    assert!(body.get("line").is_none());
}

#[tokio::test]
async fn remove_line() {
    let app = app();
    let request = json!({"product": "paver-4x8", "lines": ["A", "B", "C"], "consent_token": TOKEN});
    send(&app, post_json("/api/carts/c7/personalize", request)).await;

    let delete = |uri: &str| Request::delete(uri).body(Body::empty()).unwrap();
    let (status, _) = send(&app, delete("/api/carts/c7/lines/5")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, body) = send(&app, delete("/api/carts/c7/lines/0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lines"].as_array().unwrap().len(), 0);
}
