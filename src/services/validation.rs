use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

use crate::error::AppError;
use crate::models::CreateTicketRequest;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Create request after format checks, ready for ticket construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCreate {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub departure_time: DateTime<Utc>,
    /// Empty when the caller left it to be generated
    pub flight_number: String,
    pub passengers: i32,
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly `DDDD-DD-DD`; chrono alone tolerates signs, padding and short fields
fn is_date_shaped(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// One or two hour digits, a colon, then exactly two minute digits
fn is_time_shaped(raw: &str) -> bool {
    match raw.split_once(':') {
        Some((hour, minute)) => {
            (1..=2).contains(&hour.len())
                && all_digits(hour)
                && minute.len() == 2
                && all_digits(minute)
        }
        None => false,
    }
}

pub fn parse_departure_date(raw: &str) -> Result<NaiveDate, AppError> {
    let invalid =
        || AppError::format_with("Invalid departure_date format", "Use YYYY-MM-DD format");
    if !is_date_shaped(raw) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| invalid())
}

pub fn parse_departure_time(raw: &str) -> Result<NaiveTime, AppError> {
    let invalid = || AppError::format_with("Invalid departure_time format", "Use HH:MM format");
    if !is_time_shaped(raw) {
        return Err(invalid());
    }
    NaiveTime::parse_from_str(raw, TIME_FORMAT).map_err(|_| invalid())
}

/// Combines a calendar date with an hour and minute, seconds zeroed, in UTC
pub fn compose_departure(date: NaiveDate, time: NaiveTime) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
    Utc.from_utc_datetime(&date.and_time(time))
}

/// Checks required fields and parses the date and time of a create request
///
/// Airport codes are not checked here; ticket construction owns that rule.
pub fn validate_create(req: &CreateTicketRequest) -> Result<ValidatedCreate, AppError> {
    if req.origin.is_empty()
        || req.destination.is_empty()
        || req.departure_date.is_empty()
        || req.departure_time.is_empty()
        || req.passengers <= 0
    {
        return Err(AppError::format_with(
            "Missing required fields",
            "origin, destination, departure_date, departure_time, and passengers are required",
        ));
    }

    let departure_date = parse_departure_date(&req.departure_date)?;
    let time_of_day = parse_departure_time(&req.departure_time)?;

    Ok(ValidatedCreate {
        origin: req.origin.clone(),
        destination: req.destination.clone(),
        departure_date,
        departure_time: compose_departure(departure_date, time_of_day),
        flight_number: req.flight_number.clone().unwrap_or_default(),
        passengers: req.passengers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateTicketRequest {
        CreateTicketRequest {
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            departure_date: "2024-12-25".to_string(),
            departure_time: "14:30".to_string(),
            flight_number: Some("AA1234".to_string()),
            passengers: 2,
        }
    }

    fn error_of(result: Result<ValidatedCreate, AppError>) -> String {
        match result {
            Err(AppError::Format { error, .. }) => error,
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_create() {
        let validated = validate_create(&request()).unwrap();

        assert_eq!(
            validated.departure_date,
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
        );
        assert_eq!(
            validated.departure_time,
            Utc.with_ymd_and_hms(2024, 12, 25, 14, 30, 0).unwrap()
        );
        assert_eq!(validated.flight_number, "AA1234");
        assert_eq!(validated.passengers, 2);
    }

    #[test]
    fn test_missing_flight_number_is_empty() {
        let req = CreateTicketRequest {
            flight_number: None,
            ..request()
        };
        assert_eq!(validate_create(&req).unwrap().flight_number, "");
    }

    #[test]
    fn test_zero_passengers_rejected() {
        let req = CreateTicketRequest {
            passengers: 0,
            ..request()
        };
        assert_eq!(error_of(validate_create(&req)), "Missing required fields");

        let req = CreateTicketRequest {
            passengers: -3,
            ..request()
        };
        assert_eq!(error_of(validate_create(&req)), "Missing required fields");
    }

    #[test]
    fn test_missing_fields_rejected() {
        let req = CreateTicketRequest {
            departure_time: String::new(),
            ..request()
        };
        assert_eq!(error_of(validate_create(&req)), "Missing required fields");
    }

    #[test]
    fn test_bad_date_rejected() {
        for raw in [
            "25/12/2024",
            "2024-13-01",
            "2024-02-30",
            "tomorrow",
            "2024-1-5",
            "2024-12-5",
            "+2024-12-25",
            " 2024-12-25",
            "2024-12-25 ",
        ] {
            let req = CreateTicketRequest {
                departure_date: raw.to_string(),
                ..request()
            };
            assert_eq!(
                error_of(validate_create(&req)),
                "Invalid departure_date format",
                "{raw}"
            );
        }
    }

    #[test]
    fn test_bad_time_rejected() {
        for raw in [
            "2:30 PM", "25:00", "14:60", "14:30:15", "noon", "14:5", " 14:30", "14: 30", "014:30",
        ] {
            let req = CreateTicketRequest {
                departure_time: raw.to_string(),
                ..request()
            };
            assert_eq!(
                error_of(validate_create(&req)),
                "Invalid departure_time format",
                "{raw}"
            );
        }
    }

    #[test]
    fn test_single_digit_hour_accepted() {
        let req = CreateTicketRequest {
            departure_time: "9:30".to_string(),
            ..request()
        };
        assert_eq!(
            validate_create(&req).unwrap().departure_time,
            Utc.with_ymd_and_hms(2024, 12, 25, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_airport_codes_pass_through_unchecked() {
        let req = CreateTicketRequest {
            origin: "jfk".to_string(),
            ..request()
        };
        assert_eq!(validate_create(&req).unwrap().origin, "jfk");
    }
}
