use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::types::{ToSql, Type};
use rusqlite::{params, Connection};

use crate::models::{Booking, BookingDraft, BookingStatus, YearMonth};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const BOOKING_COLUMNS: &str = "id, booker_name, email, phone_number, roll_number, organization_name, \
     event_name, event_description, date, start_time, end_time, status, request_letter, \
     created_at, updated_at";

// ── Bookings ──

pub fn insert_booking(
    conn: &Connection,
    draft: &BookingDraft,
    now: NaiveDateTime,
) -> rusqlite::Result<i64> {
    let now = now.format(TIMESTAMP_FORMAT).to_string();

    conn.execute(
        "INSERT INTO bookings (booker_name, email, phone_number, roll_number, organization_name,
             event_name, event_description, date, start_time, end_time, status, request_letter,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
        params![
            draft.booker_name,
            draft.email,
            draft.phone_number,
            draft.roll_number,
            draft.organization_name,
            draft.event_name,
            draft.event_description,
            draft.date.format(DATE_FORMAT).to_string(),
            draft.start_time.format(TIME_FORMAT).to_string(),
            draft.end_time.format(TIME_FORMAT).to_string(),
            draft.status.as_str(),
            draft.request_letter,
            now,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_booking_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Booking>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"),
        params![id],
        parse_booking_row,
    );

    match result {
        Ok(booking) => Ok(Some(booking)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

pub fn get_bookings_for_month(
    conn: &Connection,
    month: YearMonth,
) -> rusqlite::Result<Vec<Booking>> {
    let first = month.first_day();
    let last = first + chrono::Days::new(u64::from(month.days()) - 1);

    let mut stmt = conn.prepare(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings
         WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC, start_time ASC, id ASC"
    ))?;

    let rows = stmt.query_map(
        params![
            first.format(DATE_FORMAT).to_string(),
            last.format(DATE_FORMAT).to_string()
        ],
        parse_booking_row,
    )?;
    rows.collect()
}

/// Returns `false` when no booking has that id.
pub fn update_booking_status(
    conn: &Connection,
    id: i64,
    status: BookingStatus,
    now: NaiveDateTime,
) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET status = ?1, updated_at = ?2 WHERE id = ?3",
        params![status.as_str(), now.format(TIMESTAMP_FORMAT).to_string(), id],
    )?;
    Ok(count > 0)
}

/// Writes every editable column of `booking`. `created_at` is never touched.
pub fn update_booking(conn: &Connection, booking: &Booking) -> rusqlite::Result<bool> {
    let count = conn.execute(
        "UPDATE bookings SET booker_name = ?1, email = ?2, phone_number = ?3, roll_number = ?4,
             organization_name = ?5, event_name = ?6, event_description = ?7, date = ?8,
             start_time = ?9, end_time = ?10, status = ?11, request_letter = ?12, updated_at = ?13
         WHERE id = ?14",
        params![
            booking.booker_name,
            booking.email,
            booking.phone_number,
            booking.roll_number,
            booking.organization_name,
            booking.event_name,
            booking.event_description,
            booking.date.format(DATE_FORMAT).to_string(),
            booking.start_time.format(TIME_FORMAT).to_string(),
            booking.end_time.format(TIME_FORMAT).to_string(),
            booking.status.as_str(),
            booking.request_letter,
            booking.updated_at.format(TIMESTAMP_FORMAT).to_string(),
            booking.id,
        ],
    )?;
    Ok(count > 0)
}

/// Filters for the administrative booking list. Unset fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub status: Option<BookingStatus>,
    pub date: Option<NaiveDate>,
    pub search: Option<String>,
    pub limit: i64,
}

const SEARCH_COLUMNS: [&str; 6] = [
    "event_name",
    "booker_name",
    "organization_name",
    "email",
    "phone_number",
    "event_description",
];

pub fn list_bookings(conn: &Connection, filter: &BookingFilter) -> rusqlite::Result<Vec<Booking>> {
    let mut clauses: Vec<String> = vec![];
    let mut params_vec: Vec<Box<dyn ToSql>> = vec![];

    if let Some(status) = filter.status {
        params_vec.push(Box::new(status.as_str()));
        clauses.push(format!("status = ?{}", params_vec.len()));
    }
    if let Some(date) = filter.date {
        params_vec.push(Box::new(date.format(DATE_FORMAT).to_string()));
        clauses.push(format!("date = ?{}", params_vec.len()));
    }
    if let Some(term) = filter.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        params_vec.push(Box::new(format!("%{}%", escape_like(term))));
        let n = params_vec.len();
        let any_column = SEARCH_COLUMNS
            .iter()
            .map(|col| format!("{col} LIKE ?{n} ESCAPE '\\'"))
            .collect::<Vec<_>>()
            .join(" OR ");
        clauses.push(format!("({any_column})"));
    }

    let where_sql = if clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", clauses.join(" AND "))
    };
    params_vec.push(Box::new(filter.limit));
    let sql = format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings {where_sql}
         ORDER BY date ASC, start_time ASC, id ASC LIMIT ?{}",
        params_vec.len()
    );

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
    let rows = stmt.query_map(params_refs.as_slice(), parse_booking_row)?;
    rows.collect()
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn parse_column<T>(
    row: &rusqlite::Row,
    idx: usize,
    parse: impl FnOnce(&str) -> chrono::ParseResult<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn parse_booking_row(row: &rusqlite::Row) -> rusqlite::Result<Booking> {
    let status_str: String = row.get(11)?;
    let status = status_str
        .parse::<BookingStatus>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(11, Type::Text, Box::new(e)))?;

    Ok(Booking {
        id: row.get(0)?,
        booker_name: row.get(1)?,
        email: row.get(2)?,
        phone_number: row.get(3)?,
        roll_number: row.get(4)?,
        organization_name: row.get(5)?,
        event_name: row.get(6)?,
        event_description: row.get(7)?,
        date: parse_column(row, 8, |s| NaiveDate::parse_from_str(s, DATE_FORMAT))?,
        start_time: parse_column(row, 9, |s| NaiveTime::parse_from_str(s, TIME_FORMAT))?,
        end_time: parse_column(row, 10, |s| NaiveTime::parse_from_str(s, TIME_FORMAT))?,
        status,
        request_letter: row.get(12)?,
        created_at: parse_column(row, 13, |s| {
            NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        })?,
        updated_at: parse_column(row, 14, |s| {
            NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        })?,
    })
}
