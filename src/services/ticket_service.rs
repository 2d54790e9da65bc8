use std::sync::{Arc, Mutex, PoisonError};

use rand::{rngs::StdRng, RngCore, SeedableRng};

use crate::db::TicketStore;
use crate::error::{AppError, Result};
use crate::models::{
    CreateTicketRequest, SuccessResponse, Ticket, TicketChanges, TicketStatus,
    UpdateTicketRequest,
};
use crate::services::clock::{Clock, SystemClock};
use crate::services::reconcile::reconcile_update;
use crate::services::validation::validate_create;

pub const DEFAULT_LIST_LIMIT: usize = 50;

type SharedRng = Arc<Mutex<Box<dyn RngCore + Send>>>;

/// Ticket operations sitting between the HTTP layer and the store
///
/// Every check runs before the store is touched, so a rejected request
/// never produces a partial write.
#[derive(Clone)]
pub struct TicketService {
    store: Arc<dyn TicketStore>,
    clock: Arc<dyn Clock>,
    rng: SharedRng,
}

impl TicketService {
    pub fn new(
        store: Arc<dyn TicketStore>,
        clock: Arc<dyn Clock>,
        rng: impl RngCore + Send + 'static,
    ) -> Self {
        Self {
            store,
            clock,
            rng: Arc::new(Mutex::new(Box::new(rng))),
        }
    }

    /// Wall clock and an entropy-seeded generator
    pub fn with_system_defaults(store: Arc<dyn TicketStore>) -> Self {
        Self::new(store, Arc::new(SystemClock), StdRng::from_entropy())
    }

    pub fn store(&self) -> &Arc<dyn TicketStore> {
        &self.store
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut (dyn RngCore + Send)) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut **rng)
    }

    fn require_id(confirmation_id: &str) -> Result<()> {
        if confirmation_id.is_empty() {
            return Err(AppError::validation("Confirmation ID is required"));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self, req), fields(origin = %req.origin, destination = %req.destination))]
    pub async fn create(&self, req: &CreateTicketRequest) -> Result<Ticket> {
        let validated = validate_create(req)?;
        let now = self.clock.now();

        let ticket = self
            .with_rng(|rng| {
                Ticket::new(
                    &validated.origin,
                    &validated.destination,
                    validated.departure_date,
                    validated.departure_time,
                    &validated.flight_number,
                    validated.passengers,
                    now,
                    rng,
                )
            })
            .ok_or_else(|| {
                AppError::validation_with("Invalid airport codes", "Use 3-letter IATA codes")
            })?;

        self.store
            .put(&ticket)
            .await
            .map_err(|e| AppError::store("Failed to create ticket", e))?;

        tracing::info!(confirmation_id = %ticket.confirmation_id, "Ticket created");
        Ok(ticket)
    }

    pub async fn get(&self, confirmation_id: &str) -> Result<Ticket> {
        Self::require_id(confirmation_id)?;

        self.store
            .get(confirmation_id)
            .await
            .map_err(|e| AppError::store("Failed to retrieve ticket", e))
    }

    #[tracing::instrument(skip(self, req))]
    pub async fn update(&self, confirmation_id: &str, req: &UpdateTicketRequest) -> Result<Ticket> {
        Self::require_id(confirmation_id)?;
        let changes = reconcile_update(req, self.clock.now())?;
        self.apply(confirmation_id, &changes, "Failed to update ticket")
            .await?;

        // A concurrent writer may land between the merge and this read
        self.store
            .get(confirmation_id)
            .await
            .map_err(|source| AppError::Store {
                context: "Ticket updated but failed to retrieve",
                source,
            })
    }

    /// Soft delete: the ticket is kept and marked CANCELLED
    #[tracing::instrument(skip(self))]
    pub async fn cancel(&self, confirmation_id: &str) -> Result<SuccessResponse> {
        Self::require_id(confirmation_id)?;
        let changes = TicketChanges::status(TicketStatus::Cancelled, self.clock.now());
        self.apply(confirmation_id, &changes, "Failed to cancel ticket")
            .await?;

        Ok(SuccessResponse {
            message: "Ticket cancelled successfully".to_string(),
            confirmation_id: Some(confirmation_id.to_string()),
        })
    }

    pub async fn list(&self, limit: usize) -> Result<Vec<Ticket>> {
        self.store
            .list(limit)
            .await
            .map_err(|e| AppError::store("Failed to retrieve tickets", e))
    }

    async fn apply(
        &self,
        confirmation_id: &str,
        changes: &TicketChanges,
        context: &'static str,
    ) -> Result<()> {
        self.store
            .merge(confirmation_id, changes)
            .await
            .map_err(|e| AppError::store(context, e))?;

        tracing::info!(confirmation_id = %confirmation_id, "Ticket updated");
        Ok(())
    }
}
