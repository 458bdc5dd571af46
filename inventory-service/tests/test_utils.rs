#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use inventory_service::{app, AppState, MemoryInventoryStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

/// Router backed by a fresh in-memory store.
pub fn memory_app() -> Router {
    app(AppState::new(Arc::new(MemoryInventoryStore::new())))
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

pub async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
    app.clone().oneshot(req).await.expect("router is infallible")
}

pub async fn body_json(resp: Response<Body>) -> Value {
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub async fn body_text(resp: Response<Body>) -> String {
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

/// A complete payload with every required key.
pub fn item_payload(id: i32, quantity: i32, restock_level: i32, restock_count: i32, condition: &str) -> Value {
    serde_json::json!({
        "id": id,
        "quantity": quantity,
        "restock_level": restock_level,
        "restock_count": restock_count,
        "condition": condition,
        "first_entry_date": "2011-02-02",
        "last_restock_date": "2011-02-02"
    })
}
