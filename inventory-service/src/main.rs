use anyhow::Context;
use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    HeaderValue, Method,
};
use inventory_service::config::{load_service_config, ServiceConfig, StorageBackend};
use inventory_service::{app, AppState, InventoryStore, MemoryInventoryStore, PgInventoryStore};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

async fn build_store(config: &ServiceConfig) -> anyhow::Result<Arc<dyn InventoryStore>> {
    match config.storage {
        StorageBackend::Memory => {
            warn!("using in-memory inventory store; data is lost on restart");
            Ok(Arc::new(MemoryInventoryStore::new()))
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL must be set")?;
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(database_url)
                .await
                .context("Failed to connect to Postgres")?;
            let store = PgInventoryStore::new(pool);
            if config.run_migrations {
                store.migrate().await.context("Failed to run inventory migrations")?;
                info!("inventory migrations applied");
            }
            Ok(Arc::new(store))
        }
    }
}

fn cors_layer(config: &ServiceConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        ))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_service_config()?;
    let store = build_store(&config).await?;
    let mut state = AppState::new(store);
    if let Some(dir) = &config.static_dir {
        info!(static_dir = %dir.display(), "serving admin UI");
        state = state.with_static_dir(dir.clone());
    }

    let app = app(state).layer(cors_layer(&config));

    let addr = config.bind_addr();
    info!(%addr, "starting inventory-service");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
