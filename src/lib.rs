//! Library hall booking administration.
//!
//! Staff review booking requests for the hall on a month calendar and move them
//! between PENDING, APPROVED, REJECTED and CANCELLED. Bookings live in SQLite; the
//! only overlap guard is uniqueness of `(date, start_time, end_time)`.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
