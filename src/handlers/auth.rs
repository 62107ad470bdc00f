use axum::http::{header, HeaderMap};

use crate::errors::AppError;

const STAFF_COOKIE: &str = "staff_token";

/// Staff check: `Authorization: Bearer <token>`, or the `staff_token` cookie so the
/// calendar page can be opened from a browser.
pub fn require_staff(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == STAFF_COOKIE)
        .map(|(_, value)| value);

    match bearer.or(cookie) {
        Some(token) if !expected_token.is_empty() && token == expected_token => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}
