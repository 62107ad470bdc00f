use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::queries::{self, BookingFilter};
use crate::errors::AppError;
use crate::handlers::auth::require_staff;
use crate::handlers::{now, parse_id, parse_json};
use crate::models::{Booking, BookingChanges, BookingStatus};
use crate::services::bookings;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 100;
const MAX_LIMIT: i64 = 500;

// GET /admin/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub status: Option<String>,
    pub date: Option<String>,
    pub q: Option<String>,
    pub limit: Option<i64>,
}

impl BookingsQuery {
    fn into_filter(self) -> Result<BookingFilter, AppError> {
        let status = match self.status.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Some(s.parse::<BookingStatus>()?),
            None => None,
        };
        let date = match self.date.as_deref().filter(|s| !s.is_empty()) {
            Some(s) => Some(NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                AppError::Validation(format!("date: '{s}' is not a valid YYYY-MM-DD date"))
            })?),
            None => None,
        };

        Ok(BookingFilter {
            status,
            date,
            search: self.q,
            limit: self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        })
    }
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    require_staff(&headers, &state.config.admin_token)?;
    let filter = query.into_filter()?;

    let bookings = {
        let db = state.conn()?;
        queries::list_bookings(&db, &filter)?
    };
    Ok(Json(bookings))
}

// GET /admin/bookings/:id/change/
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    require_staff(&headers, &state.config.admin_token)?;
    let id = parse_id(&raw_id)?;

    let booking = {
        let db = state.conn()?;
        bookings::get_booking(&db, id)?
    };
    Ok(Json(booking))
}

// POST /admin/bookings/:id/change/
pub async fn edit_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<Booking>, AppError> {
    require_staff(&headers, &state.config.admin_token)?;
    let id = parse_id(&raw_id)?;
    let changes: BookingChanges = parse_json(&body)?;

    let booking = {
        let db = state.conn()?;
        bookings::apply_changes(&db, id, changes, now())?
    };
    Ok(Json(booking))
}
