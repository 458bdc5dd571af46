use crate::filters::InventoryQuery;
use crate::model::InventoryItem;
use crate::service::InventoryError;
use crate::AppState;
use axum::body::Bytes;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use common_http_errors::{ApiError, ApiResult};
use serde_json::{json, Value};

pub(crate) const JSON_CONTENT_TYPE: &str = "application/json";
pub(crate) const ITEM_ALLOWED_METHODS: &str = "GET, PUT, DELETE";

/// Write endpoints only accept `application/json`; media type parameters
/// such as `charset` are tolerated.
pub(crate) fn require_json(headers: &HeaderMap) -> ApiResult<()> {
    let content_type = match headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        Some(value) => value,
        None => {
            tracing::warn!("no Content-Type specified");
            return Err(ApiError::UnsupportedMediaType { expected: JSON_CONTENT_TYPE });
        }
    };
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    if essence.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
        Ok(())
    } else {
        tracing::warn!(content_type, "invalid Content-Type");
        Err(ApiError::UnsupportedMediaType { expected: JSON_CONTENT_TYPE })
    }
}

fn item_id(path: Result<Path<i32>, PathRejection>) -> ApiResult<i32> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::bad_request("invalid_item_id", format!("Inventory id must be an integer: {e}")))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

/// Service description served at `/` when no UI directory is configured.
pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "Inventory REST API Service",
        "version": env!("CARGO_PKG_VERSION"),
        "paths": "/inventory",
    }))
}

pub async fn list_inventory(
    State(state): State<AppState>,
    query: Result<Query<InventoryQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request("invalid_filter", e.body_text()))?;
    let items = state.inventory.list(&query).await?;
    Ok(Json(items))
}

pub async fn create_inventory(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    require_json(&headers)?;
    let item = InventoryItem::from_json(&body).map_err(InventoryError::from)?;
    let created = state.inventory.create(item).await?;
    state.metrics.record_mutation("created");
    let location = format!("/inventory/{}", created.id);
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(created)))
}

pub async fn get_inventory(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<InventoryItem>> {
    let id = item_id(path)?;
    let item = state.inventory.get(id).await?;
    Ok(Json(item))
}

pub async fn update_inventory(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<InventoryItem>> {
    require_json(&headers)?;
    let id = item_id(path)?;
    // existence is checked before the payload is judged
    state.inventory.get(id).await?;
    let item = InventoryItem::from_json(&body).map_err(InventoryError::from)?;
    let updated = state.inventory.update(id, item).await?;
    state.metrics.record_mutation("updated");
    Ok(Json(updated))
}

pub async fn delete_inventory(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<StatusCode> {
    let id = item_id(path)?;
    if state.inventory.delete(id).await? {
        state.metrics.record_mutation("deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn restock_inventory(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
) -> ApiResult<Json<InventoryItem>> {
    let id = item_id(path)?;
    let (item, outcome) = state.inventory.restock(id).await?;
    state.metrics.record_restock(outcome.added());
    Ok(Json(item))
}

pub async fn item_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed {
        allow: ITEM_ALLOWED_METHODS,
        message: Some("POST is not allowed on an inventory item; use PUT to update".into()),
    }
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> (StatusCode, String) {
    match state.metrics.encode() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_content_type(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn json_content_type_accepted_with_parameters() {
        assert!(require_json(&with_content_type("application/json")).is_ok());
        assert!(require_json(&with_content_type("application/json; charset=utf-8")).is_ok());
    }

    #[test]
    fn other_or_missing_content_type_rejected() {
        assert!(require_json(&HeaderMap::new()).is_err());
        assert!(require_json(&with_content_type("text/html")).is_err());
        assert!(require_json(&with_content_type("application/jsonp")).is_err());
    }
}
