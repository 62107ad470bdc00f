pub mod bookings;
pub mod calendar;
