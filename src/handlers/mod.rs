pub mod admin;
pub mod auth;
pub mod bookings;
pub mod calendar;
pub mod health;

use serde::de::DeserializeOwned;

use crate::errors::AppError;

/// Parses a JSON request body, reporting malformed input as a validation error.
pub(crate) fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::Validation(format!("invalid JSON body: {e}")))
}

/// Parses a booking id taken from the URL. An id that is not a number cannot match a
/// record, so it is reported as not found.
pub(crate) fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::NotFound(format!("booking {raw}")))
}

/// Server-local wall clock; "today" is the local date.
pub(crate) fn now() -> chrono::NaiveDateTime {
    chrono::Local::now().naive_local()
}
