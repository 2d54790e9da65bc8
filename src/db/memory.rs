use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreError, TicketStore};
use crate::models::{Ticket, TicketChanges};

/// Process-local ticket store for development runs and tests
#[derive(Debug, Default)]
pub struct MemoryTicketStore {
    tickets: RwLock<HashMap<String, Ticket>>,
}

impl MemoryTicketStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.tickets.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tickets.read().await.is_empty()
    }
}

#[async_trait]
impl TicketStore for MemoryTicketStore {
    async fn put(&self, ticket: &Ticket) -> Result<(), StoreError> {
        self.tickets
            .write()
            .await
            .insert(ticket.confirmation_id.clone(), ticket.clone());
        tracing::debug!(confirmation_id = %ticket.confirmation_id, "Stored ticket in memory");
        Ok(())
    }

    async fn get(&self, confirmation_id: &str) -> Result<Ticket, StoreError> {
        self.tickets
            .read()
            .await
            .get(confirmation_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(confirmation_id.to_string()))
    }

    async fn merge(
        &self,
        confirmation_id: &str,
        changes: &TicketChanges,
    ) -> Result<(), StoreError> {
        let mut tickets = self.tickets.write().await;
        let ticket = tickets
            .get_mut(confirmation_id)
            .ok_or_else(|| StoreError::NotFound(confirmation_id.to_string()))?;
        changes.apply_to(ticket);
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<Ticket>, StoreError> {
        let mut tickets: Vec<Ticket> = self.tickets.read().await.values().cloned().collect();
        tickets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tickets.truncate(limit);
        Ok(tickets)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
