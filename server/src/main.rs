mod config;
mod db;
mod routes;
mod services;
mod state;
mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::store::{LeadStore, MemoryLeadStore, PgLeadStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(?config, "configuration loaded");

    let store: Arc<dyn LeadStore> = match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::init_pool(url, config.db_max_connections).await?;
            tracing::info!(max_connections = config.db_max_connections, "postgres lead store ready");
            Arc::new(PgLeadStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; leads are kept in memory and lost on restart");
            Arc::new(MemoryLeadStore::new())
        }
    };

    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set; admin endpoints are unauthenticated");
    }

    let port = config.port;
    let app = routes::app(state::AppState::new(store, config));
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!(%port, "chaitrade lead server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
