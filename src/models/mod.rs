pub mod booking;
pub mod calendar;
pub mod detail;

pub use booking::{
    Booking, BookingChanges, BookingDraft, BookingStatus, InvalidStatus, NewBooking, HALL_NAME,
};
pub use calendar::{MonthError, NavParams, Navigation, ViewMode, YearMonth};
pub use detail::BookingDetail;
