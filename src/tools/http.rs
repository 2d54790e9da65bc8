use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value as JsonValue};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::rpc::{parse_message, RpcResponse, ToolServer};

pub const SERVICE_NAME: &str = "flight-ticket-tools";

/// Streamable HTTP transport: one JSON-RPC message per POST to `/message`
pub fn router(server: ToolServer) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ])
        .max_age(std::time::Duration::from_secs(86400));

    Router::new()
        .route("/health", get(health))
        .route("/message", post(message))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(server)
}

async fn health() -> Json<JsonValue> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "transport": "http",
    }))
}

async fn message(
    State(server): State<ToolServer>,
    body: Bytes,
) -> (StatusCode, Json<RpcResponse>) {
    match parse_message(&body) {
        Ok(request) => {
            tracing::debug!(method = ?request.method, "Handling JSON-RPC message");
            (StatusCode::OK, Json(server.handle(request).await))
        }
        Err(response) => (StatusCode::BAD_REQUEST, Json(response)),
    }
}
