use chrono::NaiveDate;
use serde::Serialize;

use super::booking::Booking;

const NOT_AVAILABLE: &str = "N/A";

/// Display payload for the detail panel.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BookingDetail {
    pub id: i64,
    pub event_name: String,
    pub organization_name: String,
    pub booker_name: String,
    pub email: String,
    pub phone_number: String,
    pub roll_number: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub status: String,
    pub status_display: String,
    pub description: String,
    pub request_letter: String,
    pub is_past_due: bool,
    pub admin_url: String,
}

fn or_na(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

impl BookingDetail {
    pub fn new(booking: &Booking, admin_base_path: &str, today: NaiveDate) -> Self {
        Self {
            id: booking.id,
            event_name: booking.event_name.clone(),
            organization_name: or_na(&booking.organization_name),
            booker_name: booking.booker_name.clone(),
            email: booking.email.clone(),
            phone_number: or_na(&booking.phone_number),
            roll_number: or_na(&booking.roll_number),
            date: booking.date.format("%Y-%m-%d").to_string(),
            start_time: booking.start_time.format("%H:%M").to_string(),
            end_time: booking.end_time.format("%H:%M").to_string(),
            status: booking.status.as_str().to_string(),
            status_display: booking.status.label().to_string(),
            description: or_na(&booking.event_description),
            request_letter: or_na(&booking.request_letter),
            is_past_due: booking.is_past_due(today),
            admin_url: format!(
                "{}/{}/change/",
                admin_base_path.trim_end_matches('/'),
                booking.id
            ),
        }
    }
}
