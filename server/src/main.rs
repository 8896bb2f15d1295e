use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_server::config::ServerConfig;
use todo_server::store::{self, MemoryStore, PgTodoStore, TodoStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = config.port, "Loaded server configuration");

    let store: Arc<dyn TodoStore> = match &config.database_url {
        Some(url) => {
            let pool = store::create_pool(url)
                .await
                .context("failed to connect to database")?;
            store::health_check(&pool).await.context("database health check failed")?;
            store::run_migrations(&pool).await.context("failed to run migrations")?;
            tracing::info!("Connected to PostgreSQL, migrations applied");
            Arc::new(PgTodoStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, todos are kept in memory");
            Arc::new(MemoryStore::new())
        }
    };

    let app = todo_server::router(store).layer(build_cors_layer(&config)?);

    let addr = SocketAddr::new(
        config.host.parse().context("invalid HOST address")?,
        config.port,
    );
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl-C, shutting down");
}

fn build_cors_layer(config: &ServerConfig) -> anyhow::Result<CorsLayer> {
    let origins = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin '{o}'"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([CONTENT_TYPE]))
}
