// API module - HTTP endpoints

use axum::{http::Method, routing::get, Json, Router};
use serde_json::{json, Value as JsonValue};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod health;
pub mod state;
pub mod tickets;

pub use state::AppState;

/// Builds the ticket service router with CORS and request tracing
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::ACCEPT,
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
        .expose_headers([axum::http::header::LINK])
        .max_age(std::time::Duration::from_secs(300));

    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health::health_check))
        .merge(tickets::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn service_info() -> Json<JsonValue> {
    tracing::debug!("Called /");
    Json(json!({
        "message": "Flight Ticket Service API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
