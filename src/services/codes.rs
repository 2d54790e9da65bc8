use rand::Rng;

const CONFIRMATION_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CONFIRMATION_ID_LEN: usize = 6;

/// Airline prefix used when no valid two-character code is supplied
pub const DEFAULT_AIRLINE_CODE: &str = "AA";

/// Generates a 6-character airline confirmation ID (record locator)
///
/// Characters are sampled uniformly with replacement from `A-Z0-9`. No
/// uniqueness check happens here; the storage key is the only guard.
pub fn generate_confirmation_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CONFIRMATION_ID_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CONFIRMATION_ID_CHARSET.len());
            CONFIRMATION_ID_CHARSET[idx] as char
        })
        .collect()
}

/// Generates a flight number: two-character airline prefix plus a number in 1000..=9999
///
/// Falls back to [`DEFAULT_AIRLINE_CODE`] when `airline_code` is not exactly
/// two characters long.
pub fn generate_flight_number<R: Rng + ?Sized>(rng: &mut R, airline_code: &str) -> String {
    let airline_code = if airline_code.chars().count() == 2 {
        airline_code
    } else {
        DEFAULT_AIRLINE_CODE
    };
    let number: u16 = rng.gen_range(1000..=9999);
    format!("{}{}", airline_code.to_uppercase(), number)
}

/// Checks a 3-letter IATA airport code
///
/// The code must already be uppercase: `"jfk"` is rejected, not normalized.
pub fn validate_airport_code(code: &str) -> bool {
    code.len() == 3 && code.to_uppercase() == code
}
