use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::models::{CreateTicketRequest, UpdateTicketRequest};

#[derive(thiserror::Error, Debug)]
pub enum TicketClientError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success status; `body` is the JSON error document when there was one
    #[error("HTTP {status}: {text}")]
    ApiError {
        status: u16,
        text: String,
        body: Option<JsonValue>,
    },
}

/// HTTP client for the flight ticket service, used by the agent tools
#[derive(Debug, Clone)]
pub struct TicketApiClient {
    client: Client,
    base_url: String,
}

impl TicketApiClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[tracing::instrument(skip(self))]
    pub async fn health(&self) -> Result<JsonValue, TicketClientError> {
        let response = self.client.get(self.url("/health")).send().await?;
        Self::read_json(response).await
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn create_ticket(
        &self,
        request: &CreateTicketRequest,
    ) -> Result<JsonValue, TicketClientError> {
        self.send_json(self.client.post(self.url("/ticket")), request)
            .await
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_ticket(&self, confirmation_id: &str) -> Result<JsonValue, TicketClientError> {
        let response = self
            .client
            .get(self.url(&format!("/ticket/{}", confirmation_id)))
            .send()
            .await?;
        Self::read_json(response).await
    }

    #[tracing::instrument(skip(self, request))]
    pub async fn update_ticket(
        &self,
        confirmation_id: &str,
        request: &UpdateTicketRequest,
    ) -> Result<JsonValue, TicketClientError> {
        let builder = self
            .client
            .put(self.url(&format!("/ticket/{}", confirmation_id)));
        self.send_json(builder, request).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel_ticket(
        &self,
        confirmation_id: &str,
    ) -> Result<JsonValue, TicketClientError> {
        let response = self
            .client
            .delete(self.url(&format!("/ticket/{}", confirmation_id)))
            .send()
            .await?;
        Self::read_json(response).await
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_tickets(&self, limit: i64) -> Result<JsonValue, TicketClientError> {
        let response = self
            .client
            .get(self.url("/tickets"))
            .query(&[("limit", limit)])
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        builder: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<JsonValue, TicketClientError> {
        let response = builder.json(body).send().await?;
        Self::read_json(response).await
    }

    async fn read_json(response: Response) -> Result<JsonValue, TicketClientError> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<JsonValue>(&text).ok();
            tracing::warn!(status = %status, error = %text, "Ticket service request failed");
            return Err(TicketClientError::ApiError {
                status: status.as_u16(),
                text,
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_create_ticket_posts_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/ticket"))
            .and(body_json(json!({
                "origin": "JFK",
                "destination": "LAX",
                "departure_date": "2024-12-25",
                "departure_time": "14:30",
                "passengers": 2
            })))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!({"confirmation_id": "ABC123"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = TicketApiClient::new(&server.uri());
        let request = CreateTicketRequest {
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            departure_date: "2024-12-25".to_string(),
            departure_time: "14:30".to_string(),
            flight_number: None,
            passengers: 2,
        };

        let created = client.create_ticket(&request).await.unwrap();
        assert_eq!(created["confirmation_id"], "ABC123");
    }

    #[tokio::test]
    async fn test_api_error_keeps_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ticket/NOPE00"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "Ticket not found"})),
            )
            .mount(&server)
            .await;

        let client = TicketApiClient::new(&format!("{}/", server.uri()));
        match client.get_ticket("NOPE00").await {
            Err(TicketClientError::ApiError { status, body, .. }) => {
                assert_eq!(status, 404);
                assert_eq!(body, Some(json!({"error": "Ticket not found"})));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_error_with_plain_text() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/ticket/ABC123"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = TicketApiClient::new(&server.uri());
        let err = client.cancel_ticket("ABC123").await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
    }

    #[tokio::test]
    async fn test_list_tickets_sends_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tickets"))
            .and(query_param("limit", "5"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"tickets": [], "count": 0})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = TicketApiClient::new(&server.uri());
        let listed = client.list_tickets(5).await.unwrap();
        assert_eq!(listed["count"], 0);
    }
}
