use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::health::index))
        .route("/health", get(handlers::health::health))
        .route("/bookings", get(handlers::calendar::calendar_page))
        .route("/bookings/api/:id/", get(handlers::bookings::booking_detail))
        .route(
            "/bookings/update-status/:id/",
            post(handlers::bookings::update_status),
        )
        .route("/api/bookings", post(handlers::bookings::submit_booking))
        .route("/admin/bookings", get(handlers::admin::list_bookings))
        .route(
            "/admin/bookings/:id/change/",
            get(handlers::admin::get_booking).post(handlers::admin::edit_booking),
        )
        .with_state(state)
}
