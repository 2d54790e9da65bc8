use async_trait::async_trait;
use serde_json::Value as JsonValue;
use sqlx::{types::Json, PgPool};

use super::{StoreError, TicketStore};
use crate::models::{Ticket, TicketChanges};

/// Tickets stored as JSONB documents in the `flight_tickets` table
#[derive(Debug, Clone)]
pub struct PgTicketStore {
    pool: PgPool,
}

impl PgTicketStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketStore for PgTicketStore {
    async fn put(&self, ticket: &Ticket) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO flight_tickets (confirmation_id, document, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (confirmation_id)
            DO UPDATE SET document = EXCLUDED.document, created_at = EXCLUDED.created_at
            "#,
        )
        .bind(&ticket.confirmation_id)
        .bind(Json(ticket))
        .bind(ticket.created_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(confirmation_id = %ticket.confirmation_id, "Created ticket");
        Ok(())
    }

    async fn get(&self, confirmation_id: &str) -> Result<Ticket, StoreError> {
        let document = sqlx::query_scalar::<_, Json<Ticket>>(
            r#"
            SELECT document FROM flight_tickets WHERE confirmation_id = $1
            "#,
        )
        .bind(confirmation_id)
        .fetch_optional(&self.pool)
        .await?;

        document
            .map(|Json(ticket)| ticket)
            .ok_or_else(|| StoreError::NotFound(confirmation_id.to_string()))
    }

    async fn merge(
        &self,
        confirmation_id: &str,
        changes: &TicketChanges,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE flight_tickets
            SET document = document || $2
            WHERE confirmation_id = $1
            "#,
        )
        .bind(confirmation_id)
        .bind(Json(changes))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(confirmation_id.to_string()));
        }

        tracing::info!(confirmation_id = %confirmation_id, "Updated ticket");
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<Ticket>, StoreError> {
        let rows = sqlx::query_as::<_, (String, JsonValue)>(
            r#"
            SELECT confirmation_id, document FROM flight_tickets
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let tickets = rows
            .into_iter()
            .filter_map(|(confirmation_id, document)| {
                match serde_json::from_value::<Ticket>(document) {
                    Ok(ticket) => Some(ticket),
                    Err(e) => {
                        tracing::warn!(
                            confirmation_id = %confirmation_id,
                            error = %e,
                            "Skipping unreadable ticket document"
                        );
                        None
                    }
                }
            })
            .collect();

        Ok(tickets)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
