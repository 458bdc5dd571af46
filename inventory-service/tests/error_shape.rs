mod test_utils;

use axum::http::StatusCode;
use common_http_errors::ERROR_CODE_HEADER;
use serde_json::json;
use test_utils::*;

#[tokio::test]
async fn errors_carry_code_header_and_body() {
    let app = memory_app();
    let cases = [
        (empty_request("GET", "/inventory/31"), StatusCode::NOT_FOUND, "item_not_found"),
        (empty_request("GET", "/inventory/abc"), StatusCode::BAD_REQUEST, "invalid_item_id"),
        (empty_request("GET", "/inventory?quantity=x"), StatusCode::BAD_REQUEST, "invalid_filter"),
        (empty_request("GET", "/inventory?name=a&name=b"), StatusCode::BAD_REQUEST, "invalid_filter"),
        (empty_request("POST", "/inventory"), StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_type"),
        (json_request("POST", "/inventory", &json!({ "id": 1 })), StatusCode::BAD_REQUEST, "invalid_inventory"),
        (empty_request("POST", "/inventory/31"), StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed"),
    ];

    for (req, status, code) in cases {
        let resp = send(&app, req).await;
        assert_eq!(resp.status(), status, "{code}");
        assert_eq!(resp.headers().get(ERROR_CODE_HEADER).unwrap(), code);
        let body = body_json(resp).await;
        assert_eq!(body["code"], code);
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()), "{code}");
    }
}

#[tokio::test]
async fn malformed_query_string_is_counted_under_its_code() {
    let app = memory_app();
    let resp = send(&app, empty_request("GET", "/inventory?name=a&name=b")).await;
    assert_eq!(resp.headers().get("content-type").unwrap(), "application/json");

    let text = body_text(send(&app, empty_request("GET", "/metrics")).await).await;
    assert!(text.contains(r#"code="invalid_filter""#), "{text}");
    assert!(!text.contains(r#"code="unknown""#), "{text}");
}

#[tokio::test]
async fn unsupported_media_type_names_expected_type() {
    let resp = send(&memory_app(), empty_request("PUT", "/inventory/1")).await;
    let body = body_json(resp).await;
    assert_eq!(body["message"], "Content-Type must be application/json");
}

#[tokio::test]
async fn metrics_count_errors_and_mutations() {
    let app = memory_app();
    send(&app, json_request("POST", "/inventory", &item_payload(1, 2, 10, 0, "NEW"))).await;
    send(&app, empty_request("PUT", "/inventory/1/restock")).await;
    send(&app, empty_request("GET", "/inventory/2")).await;

    let resp = send(&app, empty_request("GET", "/metrics")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = body_text(resp).await;
    assert!(text.contains(r#"inventory_item_mutations_total{operation="created"} 1"#), "{text}");
    assert!(text.contains(r#"inventory_restock_total{outcome="topped_up"} 1"#), "{text}");
    assert!(text.contains("inventory_restock_units_total 8"), "{text}");
    assert!(text.contains(r#"code="item_not_found""#), "{text}");
}
