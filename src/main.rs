use anyhow::Context;
use secrecy::ExposeSecret;
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flight_tickets::api::{app, AppState};
use flight_tickets::config::{Config, StoreBackend};
use flight_tickets::db::{self, MemoryTicketStore, PgTicketStore, TicketStore};
use flight_tickets::services::TicketService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_tickets=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting flight ticket service...");

    // Load configuration
    let config = Config::from_env()?;
    tracing::info!(backend = ?config.store_backend, "Configuration loaded successfully");

    let mut pool = None;
    let store: Arc<dyn TicketStore> = match config.store_backend {
        StoreBackend::Postgres => {
            let database_url = config
                .database_url
                .as_ref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let pg = db::create_pool(
                database_url.expose_secret(),
                config.database_max_connections,
            )
            .await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pg).await?;
            tracing::info!("Database migrations completed");

            pool = Some(pg.clone());
            Arc::new(PgTicketStore::new(pg))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory ticket store; tickets are lost on restart");
            Arc::new(MemoryTicketStore::new())
        }
    };

    let state = AppState::new(TicketService::with_system_defaults(store));
    let app = app(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid HOST/PORT")?;
    tracing::info!("Listening on {}", addr);
    tracing::info!("  POST   /ticket              - Create new flight ticket");
    tracing::info!("  GET    /ticket/{{id}}         - Get flight ticket by confirmation ID");
    tracing::info!("  PUT    /ticket/{{id}}         - Update flight ticket");
    tracing::info!("  DELETE /ticket/{{id}}         - Cancel flight ticket");
    tracing::info!("  GET    /tickets             - List flight tickets");
    tracing::info!("  GET    /health              - Health check");

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(flight_tickets::shutdown_signal())
        .await?;

    if let Some(pool) = pool {
        pool.close().await;
        tracing::info!("Database pool closed");
    }

    tracing::info!("Server shutdown complete");
    Ok(())
}
