use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::{
    Booking, BookingChanges, BookingDetail, BookingDraft, BookingStatus, NewBooking, YearMonth,
};
use crate::services::calendar::{group_by_day, BookingsByDay};

const LETTER_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];
const LETTER_MAX_BYTES: u64 = 5 * 1024 * 1024;
const LETTER_DIR: &str = "request_letters";

// ── Lookups ──

pub fn get_booking(conn: &Connection, id: i64) -> Result<Booking, AppError> {
    queries::get_booking_by_id(conn, id)?
        .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
}

pub fn booking_detail(
    conn: &Connection,
    id: i64,
    admin_base_path: &str,
    today: NaiveDate,
) -> Result<BookingDetail, AppError> {
    let booking = get_booking(conn, id)?;
    Ok(BookingDetail::new(&booking, admin_base_path, today))
}

pub fn bookings_by_day(conn: &Connection, month: YearMonth) -> Result<BookingsByDay, AppError> {
    let bookings = queries::get_bookings_for_month(conn, month)?;
    Ok(group_by_day(month, bookings))
}

// ── Mutations ──

/// Sets the status of one booking. Any status may follow any other.
pub fn change_status(
    conn: &Connection,
    id: i64,
    requested: &str,
    now: NaiveDateTime,
) -> Result<BookingStatus, AppError> {
    get_booking(conn, id)?;
    let status: BookingStatus = requested.parse()?;

    if !queries::update_booking_status(conn, id, status, now)? {
        return Err(AppError::NotFound(format!("booking {id}")));
    }
    tracing::info!(booking_id = id, status = %status, "booking status changed");
    Ok(status)
}

/// Validates a public submission and stores it as a pending request.
pub fn submit_booking(
    conn: &Connection,
    input: NewBooking,
    now: NaiveDateTime,
) -> Result<Booking, AppError> {
    let draft = validate_submission(input, now)?;
    insert(conn, &draft, now)
}

pub fn insert(conn: &Connection, draft: &BookingDraft, now: NaiveDateTime) -> Result<Booking, AppError> {
    let id = queries::insert_booking(conn, draft, now)?;
    tracing::info!(
        booking_id = id,
        date = %draft.date,
        start = %draft.start_time,
        end = %draft.end_time,
        "booking created"
    );
    get_booking(conn, id)
}

/// Direct administrative edit. Only fields present in `changes` are touched; an empty
/// string clears an optional field.
pub fn apply_changes(
    conn: &Connection,
    id: i64,
    changes: BookingChanges,
    now: NaiveDateTime,
) -> Result<Booking, AppError> {
    let mut booking = get_booking(conn, id)?;

    if let Some(name) = changes.booker_name {
        booking.booker_name = required("booker_name", &name, 150)?;
    }
    if let Some(email) = changes.email {
        booking.email = validate_email(&email)?;
    }
    if let Some(phone) = changes.phone_number {
        booking.phone_number = optional("phone_number", Some(phone), 20)?;
    }
    if let Some(roll) = changes.roll_number {
        booking.roll_number = optional("roll_number", Some(roll), 50)?;
    }
    if let Some(org) = changes.organization_name {
        booking.organization_name = optional("organization_name", Some(org), 200)?;
    }
    if let Some(event) = changes.event_name {
        booking.event_name = required("event_name", &event, 200)?;
    }
    if let Some(description) = changes.event_description {
        booking.event_description = optional("event_description", Some(description), usize::MAX)?;
    }
    if let Some(date) = changes.date {
        booking.date = parse_date(&date)?;
    }
    if let Some(start) = changes.start_time {
        booking.start_time = parse_time("start_time", &start)?;
    }
    if let Some(end) = changes.end_time {
        booking.end_time = parse_time("end_time", &end)?;
    }
    if let Some(status) = changes.status {
        booking.status = status.parse()?;
    }
    if let Some(letter) = changes.request_letter {
        booking.request_letter = optional("request_letter", Some(letter), 255)?;
    }
    booking.updated_at = now;

    queries::update_booking(conn, &booking)?;
    tracing::info!(booking_id = id, "booking edited");
    Ok(booking)
}

// ── Validation ──

/// Turns a submission into a pending draft. The date may not be in the past;
/// `start_time < end_time` is not checked.
pub fn validate_submission(input: NewBooking, now: NaiveDateTime) -> Result<BookingDraft, AppError> {
    let date = parse_date(&input.date)?;
    if date < now.date() {
        return Err(AppError::Validation(
            "date: bookings cannot be requested for a past date".to_string(),
        ));
    }

    let request_letter = input
        .request_letter_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| request_letter_path(name, now))
        .transpose()?;
    if request_letter.is_some() {
        check_letter_size(input.request_letter_size)?;
    }

    Ok(BookingDraft {
        booker_name: required("booker_name", &input.booker_name, 150)?,
        email: validate_email(&input.email)?,
        phone_number: optional("phone_number", input.phone_number, 20)?,
        roll_number: optional("roll_number", input.roll_number, 50)?,
        organization_name: optional("organization_name", input.organization_name, 200)?,
        event_name: required("event_name", &input.event_name, 200)?,
        event_description: optional("event_description", input.event_description, usize::MAX)?,
        date,
        start_time: parse_time("start_time", &input.start_time)?,
        end_time: parse_time("end_time", &input.end_time)?,
        status: BookingStatus::Pending,
        request_letter,
    })
}

/// Storage path for an uploaded request letter, partitioned by upload year and month.
pub fn request_letter_path(file_name: &str, uploaded_at: NaiveDateTime) -> Result<String, AppError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !LETTER_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "request_letter: unsupported file type '{file_name}', expected one of {}",
            LETTER_EXTENSIONS.join(", ")
        )));
    }

    // Drop any client-side directory components.
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let sanitized: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();

    Ok(format!(
        "{LETTER_DIR}/{:04}/{:02}/{sanitized}",
        uploaded_at.year(),
        uploaded_at.month()
    ))
}

fn check_letter_size(size: Option<u64>) -> Result<(), AppError> {
    match size {
        Some(bytes) if bytes > LETTER_MAX_BYTES => Err(AppError::Validation(format!(
            "request_letter: file is {bytes} bytes, the limit is 5 MB"
        ))),
        _ => Ok(()),
    }
}

fn required(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field}: this field is required")));
    }
    check_len(field, value, max_len)?;
    Ok(value.to_string())
}

fn optional(field: &str, value: Option<String>, max_len: usize) -> Result<Option<String>, AppError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => {
            check_len(field, v, max_len)?;
            Ok(Some(v.to_string()))
        }
    }
}

fn check_len(field: &str, value: &str, max_len: usize) -> Result<(), AppError> {
    if value.chars().count() > max_len {
        return Err(AppError::Validation(format!(
            "{field}: ensure this value has at most {max_len} characters"
        )));
    }
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("date: '{raw}' is not a valid YYYY-MM-DD date")))
}

fn parse_time(field: &str, raw: &str) -> Result<NaiveTime, AppError> {
    let raw_trimmed = raw.trim();
    NaiveTime::parse_from_str(raw_trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw_trimmed, "%H:%M:%S"))
        .map_err(|_| AppError::Validation(format!("{field}: '{raw}' is not a valid HH:MM time")))
}

fn validate_email(raw: &str) -> Result<String, AppError> {
    let email = required("email", raw, 254)?;
    if !is_valid_email(&email) {
        return Err(AppError::Validation("email: enter a valid email address".to_string()));
    }
    Ok(email)
}

/// Basic address shape: one `@`, non-empty local part, dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }

    let valid_local = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_');
    let valid_domain = |c: char| c.is_alphanumeric() || matches!(c, '.' | '-');
    local.chars().all(valid_local) && domain.chars().all(valid_domain)
}
