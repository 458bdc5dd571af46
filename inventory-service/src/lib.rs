pub mod config;
pub mod filters;
pub mod inventory_handlers;
pub mod model;
pub mod restock;
pub mod service;
pub mod store;

pub use crate::filters::{Filter, InventoryQuery};
pub use crate::inventory_handlers::*;
pub use crate::model::{Condition, InventoryItem, ValidationError};
pub use crate::restock::RestockOutcome;
pub use crate::service::{InventoryError, InventoryService};
pub use crate::store::{InventoryStore, MemoryInventoryStore, PgInventoryStore, StoreError};

use axum::{
    body::Body,
    extract::State,
    middleware,
    routing::{get, put},
    Router,
};
use common_http_errors::ERROR_CODE_HEADER;
use common_observability::InventoryMetrics;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub const SERVICE_NAME: &str = "inventory-service";

#[derive(Clone)]
pub struct AppState {
    pub inventory: InventoryService,
    pub metrics: Arc<InventoryMetrics>,
    /// Directory holding the admin UI (`index.html` plus assets).
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self {
            inventory: InventoryService::new(store),
            metrics: Arc::new(InventoryMetrics::new()),
            static_dir: None,
        }
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}

async fn error_metrics_mw(
    State(metrics): State<Arc<InventoryMetrics>>,
    req: axum::http::Request<Body>,
    next: middleware::Next,
) -> axum::response::Response {
    let resp = next.run(req).await;
    let status = resp.status();
    if status.as_u16() >= 400 {
        let code = resp
            .headers()
            .get(ERROR_CODE_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown");
        metrics
            .http_errors_total
            .with_label_values(&[SERVICE_NAME, code, status.as_str()])
            .inc();
    }
    resp
}

/// Full HTTP surface minus CORS, which depends on deployment config.
pub fn app(state: AppState) -> Router {
    let metrics = state.metrics.clone();
    let router = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/inventory", get(list_inventory).post(create_inventory))
        .route("/inventory/", get(list_inventory).post(create_inventory))
        .route(
            "/inventory/:id",
            get(get_inventory)
                .put(update_inventory)
                .delete(delete_inventory)
                .post(item_method_not_allowed),
        )
        .route("/inventory/:id/restock", put(restock_inventory));
    let router = match &state.static_dir {
        Some(dir) => router
            .route_service("/", ServeFile::new(dir.join("index.html")))
            .nest_service("/static", ServeDir::new(dir)),
        None => router.route("/", get(index)),
    };
    router
        .with_state(state)
        .layer(middleware::from_fn_with_state(metrics, error_metrics_mw))
        .layer(TraceLayer::new_for_http())
}
