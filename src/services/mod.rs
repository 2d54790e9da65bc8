// Services module - Business logic

pub mod clock;
pub mod codes;
pub mod reconcile;
pub mod ticket_client;
pub mod ticket_service;
pub mod validation;

pub use ticket_service::TicketService;
