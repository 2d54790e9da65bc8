use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::db::TicketStore;
use crate::services::TicketService;

pub const SERVICE_NAME: &str = "flight-ticket-service";

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub service: String,
    pub dependencies: DependencyStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    pub store: ServiceHealth,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    pub response_time_ms: u128,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Health check endpoint
/// Returns 200 if the ticket store answers, 503 otherwise
pub async fn health_check(State(tickets): State<TicketService>) -> (StatusCode, Json<HealthResponse>) {
    let store_health = check_store(tickets.store().as_ref()).await;
    let healthy = store_health.status == "healthy";

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let response = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        service: SERVICE_NAME.to_string(),
        dependencies: DependencyStatus {
            store: store_health,
        },
    };

    tracing::info!(status = %response.status, "Health check completed");

    (status_code, Json(response))
}

async fn check_store(store: &dyn TicketStore) -> ServiceHealth {
    let start = Instant::now();

    match store.ping().await {
        Ok(()) => ServiceHealth {
            status: "healthy".to_string(),
            response_time_ms: start.elapsed().as_millis(),
            error: None,
        },
        Err(e) => ServiceHealth {
            status: "unhealthy".to_string(),
            response_time_ms: start.elapsed().as_millis(),
            error: Some(format!("Store error: {}", e)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryTicketStore;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_health_with_memory_store() {
        let service = TicketService::with_system_defaults(Arc::new(MemoryTicketStore::new()));
        let (status, Json(body)) = health_check(State(service)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "healthy");
        assert_eq!(body.service, SERVICE_NAME);
        assert!(body.dependencies.store.error.is_none());
    }
}
