// Models module - Ticket entity and request/response projections

pub mod ticket;

pub use ticket::{
    CreateTicketRequest, SuccessResponse, Ticket, TicketChanges, TicketListResponse,
    TicketStatus, UpdateTicketRequest,
};
