use chrono::{DateTime, Utc};

use crate::error::AppError;
use crate::models::{TicketChanges, TicketStatus, UpdateTicketRequest};
use crate::services::codes::validate_airport_code;
use crate::services::validation::{compose_departure, parse_departure_date, parse_departure_time};

fn supplied(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Turns a sparse update request into the validated change set to merge
///
/// Fields are checked in declaration order and the first failure rejects
/// the whole update. Empty strings and non-positive passenger counts count
/// as "not supplied". A departure time sent without a departure date is
/// placed on `now`'s UTC date, not on the ticket's stored date.
pub fn reconcile_update(
    req: &UpdateTicketRequest,
    now: DateTime<Utc>,
) -> Result<TicketChanges, AppError> {
    let mut changes = TicketChanges::touch(now);

    if let Some(origin) = supplied(&req.origin) {
        if !validate_airport_code(origin) {
            return Err(AppError::validation("Invalid origin airport code"));
        }
        changes.origin = Some(origin.to_string());
    }

    if let Some(destination) = supplied(&req.destination) {
        if !validate_airport_code(destination) {
            return Err(AppError::validation("Invalid destination airport code"));
        }
        changes.destination = Some(destination.to_string());
    }

    if let Some(raw) = supplied(&req.departure_date) {
        changes.departure_date = Some(parse_departure_date(raw)?);
    }

    if let Some(raw) = supplied(&req.departure_time) {
        let time_of_day = parse_departure_time(raw)?;
        let date = changes.departure_date.unwrap_or_else(|| now.date_naive());
        changes.departure_time = Some(compose_departure(date, time_of_day));
    }

    if let Some(flight_number) = supplied(&req.flight_number) {
        changes.flight_number = Some(flight_number.to_string());
    }

    changes.passengers = req.passengers.filter(|p| *p > 0);

    if let Some(raw) = supplied(&req.status) {
        let status = raw.parse::<TicketStatus>().map_err(|_| {
            AppError::validation_with("Invalid status", "Use CONFIRMED, CANCELLED, or PENDING")
        })?;
        changes.status = Some(status);
    }

    if changes.is_empty() {
        return Err(AppError::validation("No fields to update"));
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 13, 5, 45, 12).unwrap()
    }

    fn rejection(result: Result<TicketChanges, AppError>) -> String {
        match result {
            Err(AppError::Validation { error, .. }) | Err(AppError::Format { error, .. }) => error,
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_passengers_only() {
        let req = UpdateTicketRequest {
            passengers: Some(3),
            ..Default::default()
        };
        let changes = reconcile_update(&req, now()).unwrap();

        assert_eq!(
            changes,
            TicketChanges {
                passengers: Some(3),
                ..TicketChanges::touch(now())
            }
        );
    }

    #[test]
    fn test_empty_update_rejected() {
        let req = UpdateTicketRequest::default();
        assert_eq!(rejection(reconcile_update(&req, now())), "No fields to update");
    }

    #[test]
    fn test_empty_strings_and_zero_passengers_are_not_supplied() {
        let req = UpdateTicketRequest {
            origin: Some(String::new()),
            status: Some(String::new()),
            passengers: Some(0),
            ..Default::default()
        };
        assert_eq!(rejection(reconcile_update(&req, now())), "No fields to update");

        let req = UpdateTicketRequest {
            passengers: Some(-2),
            ..Default::default()
        };
        assert_eq!(rejection(reconcile_update(&req, now())), "No fields to update");
    }

    #[test]
    fn test_invalid_status_rejected() {
        let req = UpdateTicketRequest {
            passengers: Some(2),
            status: Some("INVALID".to_string()),
            ..Default::default()
        };
        assert_eq!(rejection(reconcile_update(&req, now())), "Invalid status");
    }

    #[test]
    fn test_airport_codes_not_normalized() {
        let req = UpdateTicketRequest {
            origin: Some("sfo".to_string()),
            ..Default::default()
        };
        assert_eq!(
            rejection(reconcile_update(&req, now())),
            "Invalid origin airport code"
        );

        let req = UpdateTicketRequest {
            destination: Some("SEAT".to_string()),
            ..Default::default()
        };
        assert_eq!(
            rejection(reconcile_update(&req, now())),
            "Invalid destination airport code"
        );
    }

    #[test]
    fn test_first_failure_wins() {
        let req = UpdateTicketRequest {
            origin: Some("bad".to_string()),
            departure_date: Some("not-a-date".to_string()),
            status: Some("INVALID".to_string()),
            ..Default::default()
        };
        assert_eq!(
            rejection(reconcile_update(&req, now())),
            "Invalid origin airport code"
        );

        let req = UpdateTicketRequest {
            departure_date: Some("not-a-date".to_string()),
            status: Some("INVALID".to_string()),
            ..Default::default()
        };
        assert_eq!(
            rejection(reconcile_update(&req, now())),
            "Invalid departure_date format"
        );
    }

    #[test]
    fn test_loose_date_and_time_shapes_rejected() {
        let req = UpdateTicketRequest {
            departure_date: Some("2025-1-10".to_string()),
            ..Default::default()
        };
        assert_eq!(
            rejection(reconcile_update(&req, now())),
            "Invalid departure_date format"
        );

        let req = UpdateTicketRequest {
            departure_time: Some("8:5".to_string()),
            ..Default::default()
        };
        assert_eq!(
            rejection(reconcile_update(&req, now())),
            "Invalid departure_time format"
        );
    }

    #[test]
    fn test_time_combines_with_supplied_date() {
        let req = UpdateTicketRequest {
            departure_date: Some("2025-01-10".to_string()),
            departure_time: Some("08:15".to_string()),
            ..Default::default()
        };
        let changes = reconcile_update(&req, now()).unwrap();

        assert_eq!(
            changes.departure_date,
            Some(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap())
        );
        assert_eq!(
            changes.departure_time,
            Some(Utc.with_ymd_and_hms(2025, 1, 10, 8, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_time_alone_uses_current_date() {
        let req = UpdateTicketRequest {
            departure_time: Some("22:05".to_string()),
            ..Default::default()
        };
        let changes = reconcile_update(&req, now()).unwrap();

        assert_eq!(changes.departure_date, None);
        assert_eq!(
            changes.departure_time,
            Some(Utc.with_ymd_and_hms(2024, 7, 13, 22, 5, 0).unwrap())
        );
    }

    #[test]
    fn test_bad_time_rejected() {
        let req = UpdateTicketRequest {
            departure_time: Some("7pm".to_string()),
            ..Default::default()
        };
        assert_eq!(
            rejection(reconcile_update(&req, now())),
            "Invalid departure_time format"
        );
    }

    #[test]
    fn test_flight_number_and_status_staged_verbatim() {
        let req = UpdateTicketRequest {
            flight_number: Some("ua 77".to_string()),
            status: Some("PENDING".to_string()),
            ..Default::default()
        };
        let changes = reconcile_update(&req, now()).unwrap();

        assert_eq!(changes.flight_number.as_deref(), Some("ua 77"));
        assert_eq!(changes.status, Some(TicketStatus::Pending));
        assert_eq!(changes.updated_at, now());
    }
}
