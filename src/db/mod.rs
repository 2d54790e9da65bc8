use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use thiserror::Error;

use crate::models::{Ticket, TicketChanges};

pub mod memory;
pub mod postgres;

pub use memory::MemoryTicketStore;
pub use postgres::PgTicketStore;

pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("ticket {0} not found")]
    NotFound(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Document storage for tickets, keyed by confirmation ID
#[async_trait]
pub trait TicketStore: Send + Sync {
    /// Creates or overwrites the document stored under the ticket's confirmation ID
    async fn put(&self, ticket: &Ticket) -> Result<(), StoreError>;

    async fn get(&self, confirmation_id: &str) -> Result<Ticket, StoreError>;

    /// Writes the staged fields onto an existing document in one operation
    async fn merge(&self, confirmation_id: &str, changes: &TicketChanges)
        -> Result<(), StoreError>;

    /// Newest tickets first
    async fn list(&self, limit: usize) -> Result<Vec<Ticket>, StoreError>;

    /// Cheap connectivity check for health reporting
    async fn ping(&self) -> Result<(), StoreError>;
}
