use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::models::{CreateTicketRequest, UpdateTicketRequest};
use crate::services::ticket_client::{TicketApiClient, TicketClientError};
use crate::tools::catalog::{self, tool_definitions};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "FlightTicketTools";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INTERNAL_ERROR: i64 = -32603;

const DEFAULT_TOOL_LIST_LIMIT: i64 = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Option<JsonValue>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub params: Option<JsonValue>,
}

impl RpcRequest {
    /// Messages without an id expect no reply
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub id: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    pub fn success(id: JsonValue, result: JsonValue) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: JsonValue, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
        }
    }
}

/// Decodes a raw JSON-RPC message, producing the error reply on failure
pub fn parse_message(body: &[u8]) -> Result<RpcRequest, RpcResponse> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RpcResponse::failure(
            JsonValue::Null,
            INVALID_REQUEST,
            "Invalid Request",
        ));
    }

    let value: JsonValue = serde_json::from_slice(body)
        .map_err(|_| RpcResponse::failure(JsonValue::Null, PARSE_ERROR, "Parse error"))?;
    if !value.is_object() {
        return Err(RpcResponse::failure(
            JsonValue::Null,
            INVALID_REQUEST,
            "Invalid Request",
        ));
    }

    serde_json::from_value(value)
        .map_err(|_| RpcResponse::failure(JsonValue::Null, INVALID_REQUEST, "Invalid Request"))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CreateTicketArgs {
    origin: String,
    destination: String,
    departure_date: String,
    departure_time: String,
    passengers: i32,
    #[serde(default)]
    flight_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfirmationArgs {
    confirmation_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UpdateTicketArgs {
    confirmation_id: String,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    departure_date: Option<String>,
    #[serde(default)]
    departure_time: Option<String>,
    #[serde(default)]
    passengers: Option<i32>,
    #[serde(default)]
    flight_number: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

impl UpdateTicketArgs {
    fn into_parts(self) -> (String, UpdateTicketRequest) {
        let changes = UpdateTicketRequest {
            origin: self.origin,
            destination: self.destination,
            departure_date: self.departure_date,
            departure_time: self.departure_time,
            flight_number: self.flight_number,
            passengers: self.passengers,
            status: self.status,
        };
        (self.confirmation_id, changes)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ListTicketsArgs {
    #[serde(default)]
    limit: Option<i64>,
}

fn arguments<T: serde::de::DeserializeOwned>(raw: JsonValue) -> Result<T, serde_json::Error> {
    let raw = if raw.is_null() { json!({}) } else { raw };
    serde_json::from_value(raw)
}

/// Renders an upstream failure the way tool callers expect it
fn tool_error(action: &str, err: TicketClientError) -> JsonValue {
    match err {
        TicketClientError::ApiError {
            body: Some(body), ..
        } => json!({ "error": body }),
        err @ TicketClientError::ApiError { .. } => json!({ "error": err.to_string() }),
        TicketClientError::HttpError(e) => json!({ "error": format!("Failed to {}: {}", action, e) }),
    }
}

fn settle(action: &str, result: Result<JsonValue, TicketClientError>) -> JsonValue {
    result.unwrap_or_else(|err| tool_error(action, err))
}

/// JSON-RPC front for the ticket service tools
#[derive(Debug, Clone)]
pub struct ToolServer {
    client: TicketApiClient,
}

impl ToolServer {
    pub fn new(client: TicketApiClient) -> Self {
        Self { client }
    }

    pub async fn handle(&self, request: RpcRequest) -> RpcResponse {
        let id = request.id.clone().unwrap_or(JsonValue::Null);
        let method = request.method.as_deref().unwrap_or_default();

        match method {
            "initialize" => RpcResponse::success(
                id,
                json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {
                        "tools": {"listChanged": false},
                        "resources": {"subscribe": false, "listChanged": false},
                        "prompts": {"listChanged": false},
                        "experimental": {}
                    },
                    "serverInfo": {
                        "name": SERVER_NAME,
                        "version": env!("CARGO_PKG_VERSION")
                    }
                }),
            ),
            "tools/list" => RpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => {
                let params = request.params.unwrap_or(JsonValue::Null);
                let name = params
                    .get("name")
                    .and_then(JsonValue::as_str)
                    .unwrap_or_default()
                    .to_string();
                let args = params.get("arguments").cloned().unwrap_or(JsonValue::Null);

                match self.call_tool(&name, args).await {
                    Ok(result) => {
                        let text = serde_json::to_string_pretty(&result)
                            .unwrap_or_else(|_| result.to_string());
                        RpcResponse::success(
                            id,
                            json!({ "content": [{ "type": "text", "text": text }] }),
                        )
                    }
                    Err(e) => {
                        tracing::warn!(tool = %name, error = %e, "Tool call rejected");
                        RpcResponse::failure(
                            id,
                            INTERNAL_ERROR,
                            format!("Tool execution error: {}", e),
                        )
                    }
                }
            }
            other => RpcResponse::failure(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }

    /// Runs one tool; only malformed arguments fail the call itself
    #[tracing::instrument(skip(self, args))]
    pub async fn call_tool(
        &self,
        name: &str,
        args: JsonValue,
    ) -> Result<JsonValue, serde_json::Error> {
        let result = match name {
            catalog::HEALTH_CHECK => settle("check health", self.client.health().await),
            catalog::CREATE_FLIGHT_TICKET => {
                let args: CreateTicketArgs = arguments(args)?;
                let request = CreateTicketRequest {
                    origin: args.origin,
                    destination: args.destination,
                    departure_date: args.departure_date,
                    departure_time: args.departure_time,
                    flight_number: args.flight_number.filter(|f| !f.is_empty()),
                    passengers: args.passengers,
                };
                settle(
                    "create ticket",
                    self.client.create_ticket(&request).await,
                )
            }
            catalog::GET_FLIGHT_TICKET => {
                let args: ConfirmationArgs = arguments(args)?;
                settle(
                    "get ticket",
                    self.client.get_ticket(&args.confirmation_id).await,
                )
            }
            catalog::UPDATE_FLIGHT_TICKET => {
                let args: UpdateTicketArgs = arguments(args)?;
                let (confirmation_id, changes) = args.into_parts();
                settle(
                    "update ticket",
                    self.client.update_ticket(&confirmation_id, &changes).await,
                )
            }
            catalog::CANCEL_FLIGHT_TICKET => {
                let args: ConfirmationArgs = arguments(args)?;
                settle(
                    "cancel ticket",
                    self.client.cancel_ticket(&args.confirmation_id).await,
                )
            }
            catalog::LIST_FLIGHT_TICKETS => {
                let args: ListTicketsArgs = arguments(args)?;
                let limit = args.limit.unwrap_or(DEFAULT_TOOL_LIST_LIMIT);
                settle("list tickets", self.client.list_tickets(limit).await)
            }
            unknown => json!({ "error": format!("Unknown tool: {}", unknown) }),
        };

        Ok(result)
    }
}
