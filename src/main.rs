use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use college_admin_api::config::AppConfig;
use college_admin_api::database::{MemoryStore, PgStore, Store};
use college_admin_api::routes::app;
use college_admin_api::seed::seed_sample_data;
use college_admin_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    tracing::info!("Starting College Admin API in {:?} mode", config.environment);

    if config.security.jwt_secret.is_empty() {
        anyhow::bail!("JWT_SECRET must be set outside development");
    }

    let store: Arc<dyn Store> = if config.database.url.is_some() {
        let store = PgStore::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        Arc::new(store)
    } else {
        anyhow::ensure!(
            !config.is_production(),
            "DATABASE_URL must be set in production"
        );
        tracing::warn!("DATABASE_URL not set, using in-memory store with sample data");
        let store = MemoryStore::new();
        seed_sample_data(&store, config.security.bcrypt_cost)
            .await
            .context("failed to seed sample data")?;
        Arc::new(store)
    };

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("College Admin API listening on http://{}", bind_addr);

    let app = app(AppState::new(store, config));
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
