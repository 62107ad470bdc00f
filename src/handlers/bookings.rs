use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::handlers::auth::require_staff;
use crate::handlers::{now, parse_id, parse_json};
use crate::models::{BookingDetail, NewBooking};
use crate::services::bookings;
use crate::state::AppState;

// GET /bookings/api/:id/
pub async fn booking_detail(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
) -> Result<Json<BookingDetail>, AppError> {
    require_staff(&headers, &state.config.admin_token)?;
    let id = parse_id(&raw_id)?;

    let detail = {
        let db = state.conn()?;
        bookings::booking_detail(&db, id, &state.config.admin_base_path, now().date())?
    };
    Ok(Json(detail))
}

// POST /bookings/update-status/:id/
#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Serialize)]
pub struct StatusUpdateResponse {
    success: bool,
    message: String,
    new_status: String,
}

pub async fn update_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> Result<Json<StatusUpdateResponse>, AppError> {
    require_staff(&headers, &state.config.admin_token)?;
    let id = parse_id(&raw_id)?;
    let request: StatusUpdateRequest = parse_json(&body)?;

    let status = {
        let db = state.conn()?;
        bookings::change_status(&db, id, &request.status, now())?
    };

    Ok(Json(StatusUpdateResponse {
        success: true,
        message: format!("Booking status updated to {}", status.label()),
        new_status: status.as_str().to_string(),
    }))
}

// POST /api/bookings
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<BookingDetail>), AppError> {
    let input: NewBooking = parse_json(&body)?;
    let now = now();

    let booking = {
        let db = state.conn()?;
        bookings::submit_booking(&db, input, now)?
    };

    Ok((
        StatusCode::CREATED,
        Json(BookingDetail::new(&booking, &state.config.admin_base_path, now.date())),
    ))
}
