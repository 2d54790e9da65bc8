use serde_json::{json, Value as JsonValue};

pub const HEALTH_CHECK: &str = "health_check";
pub const CREATE_FLIGHT_TICKET: &str = "create_flight_ticket";
pub const GET_FLIGHT_TICKET: &str = "get_flight_ticket";
pub const UPDATE_FLIGHT_TICKET: &str = "update_flight_ticket";
pub const CANCEL_FLIGHT_TICKET: &str = "cancel_flight_ticket";
pub const LIST_FLIGHT_TICKETS: &str = "list_flight_tickets";

/// Tool descriptors returned by `tools/list`
pub fn tool_definitions() -> Vec<JsonValue> {
    vec![
        json!({
            "name": HEALTH_CHECK,
            "description": "Check the health status of the Flight Ticket Service",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "required": []
            }
        }),
        json!({
            "name": CREATE_FLIGHT_TICKET,
            "description": "Create a new flight ticket with the provided details",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "origin": {"type": "string", "description": "Origin airport code (e.g., 'JFK')"},
                    "destination": {"type": "string", "description": "Destination airport code (e.g., 'LAX')"},
                    "departure_date": {"type": "string", "description": "Departure date in YYYY-MM-DD format"},
                    "departure_time": {"type": "string", "description": "Departure time in HH:MM format"},
                    "passengers": {"type": "integer", "description": "Number of passengers (minimum 1)"},
                    "flight_number": {"type": "string", "description": "Flight number (optional)"}
                },
                "required": ["origin", "destination", "departure_date", "departure_time", "passengers"]
            }
        }),
        json!({
            "name": GET_FLIGHT_TICKET,
            "description": "Retrieve a flight ticket using its confirmation ID",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "confirmation_id": {"type": "string", "description": "Ticket confirmation ID"}
                },
                "required": ["confirmation_id"]
            }
        }),
        json!({
            "name": UPDATE_FLIGHT_TICKET,
            "description": "Update an existing flight ticket with new information",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "confirmation_id": {"type": "string", "description": "Ticket confirmation ID"},
                    "origin": {"type": "string", "description": "New origin airport code (optional)"},
                    "destination": {"type": "string", "description": "New destination airport code (optional)"},
                    "departure_date": {"type": "string", "description": "New departure date (optional)"},
                    "departure_time": {"type": "string", "description": "New departure time (optional)"},
                    "passengers": {"type": "integer", "description": "New number of passengers (optional)"},
                    "flight_number": {"type": "string", "description": "New flight number (optional)"},
                    "status": {"type": "string", "description": "New status (optional)"}
                },
                "required": ["confirmation_id"]
            }
        }),
        json!({
            "name": CANCEL_FLIGHT_TICKET,
            "description": "Cancel a flight ticket by setting its status to CANCELLED",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "confirmation_id": {"type": "string", "description": "Ticket confirmation ID"}
                },
                "required": ["confirmation_id"]
            }
        }),
        json!({
            "name": LIST_FLIGHT_TICKETS,
            "description": "Retrieve a list of all flight tickets with optional pagination",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "limit": {"type": "integer", "description": "Maximum number of tickets to return (default: 50)"}
                },
                "required": []
            }
        }),
    ]
}
