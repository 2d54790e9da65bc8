use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use crate::services::codes::{
    generate_confirmation_id, generate_flight_number, validate_airport_code, DEFAULT_AIRLINE_CODE,
};

/// Reservation state; tickets are never deleted, only moved between these
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Confirmed => "CONFIRMED",
            TicketStatus::Pending => "PENDING",
            TicketStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ticket status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for TicketStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONFIRMED" => Ok(TicketStatus::Confirmed),
            "PENDING" => Ok(TicketStatus::Pending),
            "CANCELLED" => Ok(TicketStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A flight ticket as persisted in the document store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// 6-character alphanumeric record locator, also the storage key
    pub confirmation_id: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    /// Departure date combined with the HH:MM departure time, in UTC
    pub departure_time: DateTime<Utc>,
    pub flight_number: String,
    pub passengers: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: TicketStatus,
}

impl Ticket {
    /// Builds a freshly confirmed ticket
    ///
    /// Returns `None` when either airport code is invalid. An empty
    /// `flight_number` gets a generated one under the default airline.
    #[allow(clippy::too_many_arguments)]
    pub fn new<R: Rng + ?Sized>(
        origin: &str,
        destination: &str,
        departure_date: NaiveDate,
        departure_time: DateTime<Utc>,
        flight_number: &str,
        passengers: i32,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<Self> {
        if !validate_airport_code(origin) || !validate_airport_code(destination) {
            return None;
        }

        let flight_number = if flight_number.is_empty() {
            generate_flight_number(rng, DEFAULT_AIRLINE_CODE)
        } else {
            flight_number.to_string()
        };

        Some(Self {
            confirmation_id: generate_confirmation_id(rng),
            origin: origin.to_uppercase(),
            destination: destination.to_uppercase(),
            departure_date,
            departure_time,
            flight_number: flight_number.to_uppercase(),
            passengers,
            created_at: now,
            updated_at: now,
            status: TicketStatus::Confirmed,
        })
    }
}

/// Payload for `POST /ticket`
///
/// Missing fields deserialize to their empty values so they are reported as
/// missing rather than as malformed JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateTicketRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub origin: String,
    #[serde(deserialize_with = "null_as_default")]
    pub destination: String,
    /// `YYYY-MM-DD`
    #[serde(deserialize_with = "null_as_default")]
    pub departure_date: String,
    /// `HH:MM`, 24-hour
    #[serde(deserialize_with = "null_as_default")]
    pub departure_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub passengers: i32,
}

/// Explicit `null` reads as the empty value, same as an absent field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Payload for `PUT /ticket/:confirmation_id`; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTicketRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passengers: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Validated field set for a partial update
///
/// Serializes to exactly the supplied fields plus `updated_at`, which is the
/// document fragment merged into the stored ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passengers: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    pub updated_at: DateTime<Utc>,
}

impl TicketChanges {
    /// An empty change set that only refreshes `updated_at`
    pub fn touch(updated_at: DateTime<Utc>) -> Self {
        Self {
            origin: None,
            destination: None,
            departure_date: None,
            departure_time: None,
            flight_number: None,
            passengers: None,
            status: None,
            updated_at,
        }
    }

    /// Change set used by cancellation
    pub fn status(status: TicketStatus, updated_at: DateTime<Utc>) -> Self {
        Self {
            status: Some(status),
            ..Self::touch(updated_at)
        }
    }

    /// True when no caller-supplied field is staged
    pub fn is_empty(&self) -> bool {
        self.origin.is_none()
            && self.destination.is_none()
            && self.departure_date.is_none()
            && self.departure_time.is_none()
            && self.flight_number.is_none()
            && self.passengers.is_none()
            && self.status.is_none()
    }

    pub fn apply_to(&self, ticket: &mut Ticket) {
        if let Some(origin) = &self.origin {
            ticket.origin = origin.clone();
        }
        if let Some(destination) = &self.destination {
            ticket.destination = destination.clone();
        }
        if let Some(date) = self.departure_date {
            ticket.departure_date = date;
        }
        if let Some(time) = self.departure_time {
            ticket.departure_time = time;
        }
        if let Some(flight_number) = &self.flight_number {
            ticket.flight_number = flight_number.clone();
        }
        if let Some(passengers) = self.passengers {
            ticket.passengers = passengers;
        }
        if let Some(status) = self.status {
            ticket.status = status;
        }
        ticket.updated_at = self.updated_at;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketListResponse {
    pub tickets: Vec<Ticket>,
    pub count: usize,
}

impl From<Vec<Ticket>> for TicketListResponse {
    fn from(tickets: Vec<Ticket>) -> Self {
        Self {
            count: tickets.len(),
            tickets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 12, 19, 0, 0).unwrap()
    }

    fn departure() -> (NaiveDate, DateTime<Utc>) {
        (
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 14, 30, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_ticket() {
        let (date, time) = departure();
        let mut rng = StdRng::seed_from_u64(1);
        let ticket = Ticket::new("JFK", "LAX", date, time, "AA1234", 2, now(), &mut rng).unwrap();

        assert_eq!(ticket.origin, "JFK");
        assert_eq!(ticket.destination, "LAX");
        assert_eq!(ticket.departure_date, date);
        assert_eq!(ticket.departure_time, time);
        assert_eq!(ticket.flight_number, "AA1234");
        assert_eq!(ticket.passengers, 2);
        assert_eq!(ticket.status, TicketStatus::Confirmed);
        assert_eq!(ticket.confirmation_id.len(), 6);
        assert_eq!(ticket.created_at, now());
        assert_eq!(ticket.updated_at, ticket.created_at);
    }

    #[test]
    fn test_new_ticket_rejects_invalid_airports() {
        let (date, time) = departure();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(Ticket::new("INVALID", "LAX", date, time, "AA1234", 2, now(), &mut rng).is_none());
        assert!(Ticket::new("JFK", "invalid", date, time, "AA1234", 2, now(), &mut rng).is_none());
        assert!(Ticket::new("jfk", "LAX", date, time, "AA1234", 2, now(), &mut rng).is_none());
    }

    #[test]
    fn test_new_ticket_generates_flight_number() {
        let (date, time) = departure();
        let mut rng = StdRng::seed_from_u64(5);
        let ticket = Ticket::new("JFK", "LAX", date, time, "", 1, now(), &mut rng).unwrap();

        assert!(ticket.flight_number.starts_with("AA"));
        assert_eq!(ticket.flight_number.len(), 6);
    }

    #[test]
    fn test_new_ticket_uppercases_flight_number() {
        let (date, time) = departure();
        let mut rng = StdRng::seed_from_u64(5);
        let ticket = Ticket::new("JFK", "LAX", date, time, "dl456", 1, now(), &mut rng).unwrap();

        assert_eq!(ticket.flight_number, "DL456");
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("PENDING".parse::<TicketStatus>(), Ok(TicketStatus::Pending));
        assert_eq!(
            "CANCELLED".parse::<TicketStatus>(),
            Ok(TicketStatus::Cancelled)
        );
        assert!("cancelled".parse::<TicketStatus>().is_err());
        assert!("INVALID".parse::<TicketStatus>().is_err());
    }

    #[test]
    fn test_create_request_null_fields_are_empty() {
        let req: CreateTicketRequest = serde_json::from_value(serde_json::json!({
            "origin": null,
            "destination": "LAX",
            "passengers": null,
            "flight_number": null
        }))
        .unwrap();

        assert_eq!(req.origin, "");
        assert_eq!(req.destination, "LAX");
        assert_eq!(req.departure_date, "");
        assert_eq!(req.passengers, 0);
        assert_eq!(req.flight_number, None);
    }

    #[test]
    fn test_ticket_json_field_names() {
        let (date, time) = departure();
        let mut rng = StdRng::seed_from_u64(2);
        let ticket = Ticket::new("JFK", "LAX", date, time, "AA1234", 2, now(), &mut rng).unwrap();
        let value = serde_json::to_value(&ticket).unwrap();

        assert_eq!(value["status"], "CONFIRMED");
        assert_eq!(value["departure_date"], "2024-12-25");
        assert_eq!(value["departure_time"], "2024-01-01T14:30:00Z");
        for field in [
            "confirmation_id",
            "origin",
            "destination",
            "flight_number",
            "passengers",
            "created_at",
            "updated_at",
        ] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn test_changes_serialize_only_staged_fields() {
        let changes = TicketChanges {
            passengers: Some(3),
            ..TicketChanges::touch(now())
        };
        let value = serde_json::to_value(&changes).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 2);
        assert_eq!(object["passengers"], 3);
        assert!(object.contains_key("updated_at"));
    }

    #[test]
    fn test_changes_apply_to() {
        let (date, time) = departure();
        let mut rng = StdRng::seed_from_u64(2);
        let mut ticket =
            Ticket::new("JFK", "LAX", date, time, "AA1234", 2, now(), &mut rng).unwrap();
        let later = now() + chrono::Duration::hours(1);

        TicketChanges::status(TicketStatus::Cancelled, later).apply_to(&mut ticket);

        assert_eq!(ticket.status, TicketStatus::Cancelled);
        assert_eq!(ticket.updated_at, later);
        assert_eq!(ticket.passengers, 2);
        assert_eq!(ticket.origin, "JFK");
    }
}
