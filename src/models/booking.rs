use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// The hall every booking refers to. There is exactly one.
pub const HALL_NAME: &str = "library_hall";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    pub id: i64,
    pub booker_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub roll_number: Option<String>,
    pub organization_name: Option<String>,
    pub event_name: String,
    pub event_description: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub request_letter: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Booking {
    pub fn is_past_due(&self, today: NaiveDate) -> bool {
        self.date < today
    }
}

impl fmt::Display for Booking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} by {} - {HALL_NAME}", self.event_name, self.booker_name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Approved,
        BookingStatus::Rejected,
        BookingStatus::Cancelled,
    ];

    /// Stored and wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Approved => "APPROVED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending Approval",
            BookingStatus::Approved => "Approved",
            BookingStatus::Rejected => "Rejected",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    /// CSS class used by the calendar and the detail panel.
    pub fn css_class(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "status-pending",
            BookingStatus::Approved => "status-approved",
            BookingStatus::Rejected => "status-rejected",
            BookingStatus::Cancelled => "status-cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid status '{0}', expected one of PENDING, APPROVED, REJECTED, CANCELLED")]
pub struct InvalidStatus(pub String);

impl FromStr for BookingStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| InvalidStatus(s.to_string()))
    }
}

/// A validated booking that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub booker_name: String,
    pub email: String,
    pub phone_number: Option<String>,
    pub roll_number: Option<String>,
    pub organization_name: Option<String>,
    pub event_name: String,
    pub event_description: Option<String>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub request_letter: Option<String>,
}

/// Request body of the submission form, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewBooking {
    pub booker_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub organization_name: Option<String>,
    pub event_name: String,
    #[serde(default)]
    pub event_description: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub request_letter_name: Option<String>,
    /// Size of the uploaded letter in bytes, as reported by the upload.
    #[serde(default)]
    pub request_letter_size: Option<u64>,
}

/// Partial update applied by a direct administrative edit.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookingChanges {
    pub booker_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub roll_number: Option<String>,
    pub organization_name: Option<String>,
    pub event_name: Option<String>,
    pub event_description: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<String>,
    pub request_letter: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Booking {
        let ts = NaiveDateTime::parse_from_str("2026-03-01 09:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        Booking {
            id: 1,
            booker_name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            phone_number: None,
            roll_number: None,
            organization_name: None,
            event_name: "Poetry Night".to_string(),
            event_description: None,
            date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            status: BookingStatus::Pending,
            request_letter: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("APPROVED".parse::<BookingStatus>(), Ok(BookingStatus::Approved));
        assert_eq!("CANCELLED".parse::<BookingStatus>(), Ok(BookingStatus::Cancelled));
        assert!("approved".parse::<BookingStatus>().is_err());
        assert!("DONE".parse::<BookingStatus>().is_err());
        assert!("".parse::<BookingStatus>().is_err());
    }

    #[test]
    fn test_status_css_class_is_lowercased_value() {
        for status in BookingStatus::ALL {
            assert_eq!(
                status.css_class(),
                format!("status-{}", status.as_str().to_lowercase())
            );
        }
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&BookingStatus::Rejected).unwrap(),
            "\"REJECTED\""
        );
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
    }

    #[test]
    fn test_is_past_due() {
        let booking = sample();
        assert!(booking.is_past_due(NaiveDate::from_ymd_opt(2026, 3, 11).unwrap()));
        assert!(!booking.is_past_due(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()));
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "Poetry Night by Asha - library_hall");
    }
}
