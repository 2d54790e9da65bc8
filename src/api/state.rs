use axum::extract::FromRef;

use crate::services::TicketService;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub tickets: TicketService,
}

impl AppState {
    pub fn new(tickets: TicketService) -> Self {
        Self { tickets }
    }
}

impl FromRef<AppState> for TicketService {
    fn from_ref(state: &AppState) -> TicketService {
        state.tickets.clone()
    }
}
