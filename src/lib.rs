pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export logic types
pub use logic::{
    ActionError, BulkDeleteOutcome, FailedDelete, FieldError, GroupForm, ImageSource,
    PageController, PageSnapshot, ProductForm, UploadedFile,
};

// Export all model types
pub use model::*;

// Export store types
pub use store::{BlobStore, LocalBlobStore, MemoryStore, PostgresStore, Store};

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::config::AppConfig;

/// Build the router for `store`, with page state loaded from it once
pub async fn build_app<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> axum::Router {
    let blobs = LocalBlobStore::new(&config.storage.upload_dir, &config.public_media_url());

    let mut controller = PageController::new(store, Arc::new(blobs), config.storage.max_upload_bytes);
    controller.load().await;
    log::info!(
        "Loaded {} products and {} groups",
        controller.products().len(),
        controller.groups().len()
    );

    crate::api::routes::create_router::<S>(&config.storage.upload_dir)
        .with_state(Arc::new(Mutex::new(controller)))
}

/// Load configuration, pick a store and serve until the listener closes.
///
/// `.env` loading and logger setup belong to the binary's `main`.
pub async fn run_server() -> anyhow::Result<()> {
    let config = AppConfig::load()?;

    match config.database_url() {
        Some(database_url) => {
            let max_connections = config.database.max_connections.unwrap_or(20);
            let postgres_store = PostgresStore::new(&database_url, max_connections).await?;
            postgres_store.migrate().await?;
            serve_store(Arc::new(postgres_store), &config).await
        }
        None => {
            log::warn!("No database configured, documents are kept in memory");
            serve_store(Arc::new(MemoryStore::new()), &config).await
        }
    }
}

async fn serve_store<S: Store + 'static>(store: Arc<S>, config: &AppConfig) -> anyhow::Result<()> {
    use axum::serve;
    use tokio::net::TcpListener;

    tokio::fs::create_dir_all(&config.storage.upload_dir).await?;
    let app = build_app(store, config).await;

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Inventory board running on http://{}", bind_address);
    if let Some(target) = &config.deploy.target {
        log::info!("Deploy target override: {}", target);
    }

    serve(listener, app).await?;

    Ok(())
}
