use common_http_errors::ApiError;
use axum::response::IntoResponse;
use axum::http::{header, StatusCode};
use http_body_util::BodyExt;

async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[test]
fn bad_request_variant() {
    let err = ApiError::BadRequest { code: "invalid_something", message: None };
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "invalid_something");
}

#[test]
fn not_found_variant() {
    let err = ApiError::not_found("missing_resource", "resource 7 does not exist");
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "missing_resource");
}

#[test]
fn conflict_variant() {
    let err = ApiError::conflict("already_there", "resource 7 already exists");
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "already_there");
}

#[test]
fn method_not_allowed_sets_allow_header() {
    let err = ApiError::MethodNotAllowed { allow: "GET, PUT, DELETE", message: None };
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers().get(header::ALLOW).unwrap(), "GET, PUT, DELETE");
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "method_not_allowed");
}

#[tokio::test]
async fn unsupported_media_type_names_expected_type() {
    let resp = ApiError::UnsupportedMediaType { expected: "application/json" }.into_response();
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "unsupported_media_type");
    assert_eq!(body["message"], "Content-Type must be application/json");
}

#[tokio::test]
async fn internal_variant() {
    let err = ApiError::internal("boom");
    let resp = err.into_response();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.headers().get("X-Error-Code").unwrap(), "internal_error");
    let body = body_json(resp).await;
    assert_eq!(body["message"], "boom");
}

#[tokio::test]
async fn message_is_omitted_when_absent() {
    let resp = ApiError::BadRequest { code: "bare", message: None }.into_response();
    let body = body_json(resp).await;
    assert!(body.get("message").is_none(), "body was: {body}");
}
