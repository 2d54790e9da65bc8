use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::state::AppState;
use crate::error::{AppError, Result};
use crate::models::{
    CreateTicketRequest, SuccessResponse, Ticket, TicketListResponse, UpdateTicketRequest,
};
use crate::services::{ticket_service::DEFAULT_LIST_LIMIT, TicketService};

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        AppError::format("Invalid JSON payload")
    })
}

/// Create a new flight ticket
async fn create_ticket(
    State(tickets): State<TicketService>,
    payload: std::result::Result<Json<CreateTicketRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Ticket>)> {
    let request = json_body(payload)?;
    let ticket = tickets.create(&request).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// Fetch a ticket by confirmation ID
async fn get_ticket(
    State(tickets): State<TicketService>,
    Path(confirmation_id): Path<String>,
) -> Result<Json<Ticket>> {
    let ticket = tickets.get(&confirmation_id).await.map_err(|e| {
        tracing::warn!(confirmation_id = %confirmation_id, error = %e, "Failed to get ticket");
        e
    })?;
    Ok(Json(ticket))
}

/// Apply a partial update and return the refreshed ticket
async fn update_ticket(
    State(tickets): State<TicketService>,
    Path(confirmation_id): Path<String>,
    payload: std::result::Result<Json<UpdateTicketRequest>, JsonRejection>,
) -> Result<Json<Ticket>> {
    let request = json_body(payload)?;
    let ticket = tickets.update(&confirmation_id, &request).await?;
    Ok(Json(ticket))
}

/// Cancel (soft delete) a ticket
async fn cancel_ticket(
    State(tickets): State<TicketService>,
    Path(confirmation_id): Path<String>,
) -> Result<Json<SuccessResponse>> {
    let response = tickets.cancel(&confirmation_id).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    limit: Option<String>,
}

impl ListQuery {
    /// Unparsable or non-positive limits fall back to the default
    fn limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

/// List tickets, newest first
async fn list_tickets(
    State(tickets): State<TicketService>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TicketListResponse>> {
    let listed = tickets.list(query.limit()).await?;
    Ok(Json(TicketListResponse::from(listed)))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ticket", post(create_ticket))
        .route(
            "/ticket/:confirmation_id",
            get(get_ticket).put(update_ticket).delete(cancel_ticket),
        )
        .route("/tickets", get(list_tickets))
}
