use anyhow::Context;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flight_tickets::config::{ToolsConfig, ToolsTransport};
use flight_tickets::services::ticket_client::TicketApiClient;
use flight_tickets::tools::{http, stdio, ToolServer};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries protocol traffic in stdio mode, so logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flight_tickets=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ToolsConfig::from_env()?;
    let server = ToolServer::new(TicketApiClient::new(&config.ticket_service_url));
    tracing::info!(
        upstream = %config.ticket_service_url,
        transport = ?config.transport,
        "Starting flight ticket tools"
    );

    match config.transport {
        ToolsTransport::Stdio => {
            let input = tokio::io::BufReader::new(tokio::io::stdin());
            tokio::select! {
                result = stdio::serve(&server, input, tokio::io::stdout()) => result?,
                _ = flight_tickets::shutdown_signal() => {}
            }
        }
        ToolsTransport::Http => {
            let addr: SocketAddr = format!("{}:{}", config.host, config.port)
                .parse()
                .context("invalid HOST/PORT")?;
            tracing::info!("Listening on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, http::router(server))
                .with_graceful_shutdown(flight_tickets::shutdown_signal())
                .await?;
        }
    }

    tracing::info!("Tool server stopped");
    Ok(())
}
