use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::{Booking, Navigation, ViewMode, YearMonth};

/// Bookings of one month keyed by day of month.
pub type BookingsByDay = BTreeMap<u32, Vec<Booking>>;

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Groups bookings by day, keeping their order within a day. Bookings outside
/// `month` are dropped.
pub fn group_by_day(month: YearMonth, bookings: Vec<Booking>) -> BookingsByDay {
    let mut by_day = BookingsByDay::new();
    for booking in bookings.into_iter().filter(|b| month.contains(b.date)) {
        by_day.entry(booking.date.day()).or_default().push(booking);
    }
    by_day
}

/// Weeks of `month`, Monday first. `None` marks a day of an adjacent month.
pub fn month_weeks(month: YearMonth) -> Vec<[Option<u32>; 7]> {
    let lead = month.first_day().weekday().num_days_from_monday();
    let days = month.days();

    let mut weeks = vec![];
    let mut week = [None; 7];
    let mut col = lead as usize;
    for day in 1..=days {
        week[col] = Some(day);
        col += 1;
        if col == 7 {
            weeks.push(week);
            week = [None; 7];
            col = 0;
        }
    }
    if col > 0 {
        weeks.push(week);
    }
    weeks
}

/// Renders one cell of the month table.
pub fn render_day_cell(
    day: Option<u32>,
    _weekday: Weekday,
    bookings: &BookingsByDay,
    today: NaiveDate,
    month: YearMonth,
) -> String {
    let Some(day) = day else {
        return r#"<td class="day is-empty">&nbsp;</td>"#.to_string();
    };

    let is_today = month.contains(today) && today.day() == day;
    let classes = if is_today { "day today-highlight" } else { "day" };

    let mut html = format!(
        r#"<td class="{classes}"><span class="day-number">{day}</span><div class="events">"#
    );
    for booking in bookings.get(&day).into_iter().flatten() {
        html.push_str(&format!(
            r#"<div class="event-item {}" data-booking-id="{}" role="button" tabindex="0">{}</div>"#,
            booking.status.css_class(),
            booking.id,
            escape_html(&booking.event_name),
        ));
    }
    html.push_str("</div></td>");
    html
}

/// Renders the month as an HTML table.
pub fn render_month(month: YearMonth, bookings: &BookingsByDay, today: NaiveDate) -> String {
    let mut html = String::from(
        r#"<table border="0" cellpadding="0" cellspacing="0" class="month">"#,
    );
    html.push('\n');
    html.push_str(&format!(
        "<tr><th colspan=\"7\" class=\"month\">{}</th></tr>\n",
        month.label()
    ));

    html.push_str("<tr>");
    for weekday in WEEKDAYS {
        let short = weekday.to_string();
        html.push_str(&format!(r#"<th class="{}">{short}</th>"#, short.to_lowercase()));
    }
    html.push_str("</tr>\n");

    for week in month_weeks(month) {
        html.push_str("<tr>");
        for (day, weekday) in week.into_iter().zip(WEEKDAYS) {
            html.push_str(&render_day_cell(day, weekday, bookings, today, month));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

/// Everything the calendar page needs for one request.
#[derive(Debug, Clone)]
pub struct CalendarView {
    pub month: YearMonth,
    pub view: ViewMode,
    pub navigation: Navigation,
    pub table_html: String,
}

impl CalendarView {
    /// Week and day views are not implemented; every mode renders the month table.
    pub fn build(month: YearMonth, view: ViewMode, bookings: Vec<Booking>, today: NaiveDate) -> Self {
        let by_day = group_by_day(month, bookings);
        Self {
            month,
            view,
            navigation: Navigation::new(month, view, today),
            table_html: render_month(month, &by_day, today),
        }
    }
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDateTime, NaiveTime};

    use super::*;
    use crate::models::BookingStatus;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking(id: i64, event: &str, on: NaiveDate, status: BookingStatus) -> Booking {
        let ts = NaiveDateTime::parse_from_str("2026-01-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        Booking {
            id,
            booker_name: "Kiran".to_string(),
            email: "kiran@example.com".to_string(),
            phone_number: None,
            roll_number: None,
            organization_name: None,
            event_name: event.to_string(),
            event_description: None,
            date: on,
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap(),
            status,
            request_letter: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn test_group_by_day_keeps_month_only() {
        let month = ym(2026, 10);
        let bookings = vec![
            booking(1, "A", date(2026, 10, 3), BookingStatus::Pending),
            booking(2, "B", date(2026, 11, 3), BookingStatus::Pending),
            booking(3, "C", date(2026, 10, 3), BookingStatus::Approved),
            booking(4, "D", date(2025, 10, 3), BookingStatus::Pending),
            booking(5, "E", date(2026, 10, 31), BookingStatus::Rejected),
        ];

        let grouped = group_by_day(month, bookings);
        assert_eq!(grouped.len(), 2);
        let ids: Vec<i64> = grouped[&3].iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(grouped[&31][0].id, 5);

        let total: usize = grouped.values().map(Vec::len).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_group_by_day_empty() {
        assert!(group_by_day(ym(2026, 2), vec![]).is_empty());
    }

    #[test]
    fn test_month_weeks_start_monday() {
        // 1 October 2026 is a Thursday.
        let weeks = month_weeks(ym(2026, 10));
        assert_eq!(weeks[0], [None, None, None, Some(1), Some(2), Some(3), Some(4)]);
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[4], [Some(26), Some(27), Some(28), Some(29), Some(30), Some(31), None]);
    }

    #[test]
    fn test_month_weeks_exact_fit() {
        // February 2027 starts on a Monday and has 28 days.
        let weeks = month_weeks(ym(2027, 2));
        assert_eq!(weeks.len(), 4);
        assert!(weeks.iter().flatten().all(Option::is_some));
    }

    #[test]
    fn test_every_day_rendered_once() {
        for (y, m) in [(2024, 2), (2026, 2), (2026, 4), (2026, 10), (2026, 12)] {
            let month = ym(y, m);
            let html = render_month(month, &BookingsByDay::new(), date(2000, 1, 1));
            let day_cells = html.matches(r#"<td class="day">"#).count();
            assert_eq!(day_cells as u32, month.days(), "{y}-{m}");

            let cells = html.matches("<td ").count();
            assert_eq!(cells % 7, 0);
            assert_eq!(html.matches("is-empty").count(), cells - day_cells);
        }
    }

    #[test]
    fn test_empty_month_has_no_events() {
        let html = render_month(ym(2026, 3), &BookingsByDay::new(), date(2026, 3, 5));
        assert!(!html.contains("event-item"));
        assert_eq!(html.matches(r#"<div class="events"></div>"#).count(), 31);
    }

    #[test]
    fn test_day_cell_lists_events_with_status_tag() {
        let month = ym(2026, 10);
        let grouped = group_by_day(
            month,
            vec![
                booking(7, "Debate <Finals>", date(2026, 10, 9), BookingStatus::Approved),
                booking(8, "Open Mic", date(2026, 10, 9), BookingStatus::Cancelled),
            ],
        );

        let cell = render_day_cell(Some(9), Weekday::Fri, &grouped, date(2026, 1, 1), month);
        assert!(cell.starts_with(r#"<td class="day"><span class="day-number">9</span>"#));
        assert!(cell.contains(r#"class="event-item status-approved" data-booking-id="7""#));
        assert!(cell.contains("Debate &lt;Finals&gt;"));
        assert!(cell.contains(r#"class="event-item status-cancelled" data-booking-id="8""#));
        assert!(cell.find("Debate").unwrap() < cell.find("Open Mic").unwrap());
    }

    #[test]
    fn test_empty_cell() {
        let cell = render_day_cell(None, Weekday::Mon, &BookingsByDay::new(), date(2026, 1, 1), ym(2026, 1));
        assert_eq!(cell, r#"<td class="day is-empty">&nbsp;</td>"#);
    }

    #[test]
    fn test_today_highlight_only_in_current_month() {
        let today = date(2026, 10, 16);
        let html = render_month(ym(2026, 10), &BookingsByDay::new(), today);
        assert_eq!(html.matches("today-highlight").count(), 1);
        assert!(html.contains(r#"<td class="day today-highlight"><span class="day-number">16</span>"#));

        let other_year = render_month(ym(2025, 10), &BookingsByDay::new(), today);
        assert!(!other_year.contains("today-highlight"));
        let other_month = render_month(ym(2026, 9), &BookingsByDay::new(), today);
        assert!(!other_month.contains("today-highlight"));
    }

    #[test]
    fn test_header_rows() {
        let html = render_month(ym(2026, 10), &BookingsByDay::new(), date(2026, 10, 16));
        assert!(html.contains(r#"<th colspan="7" class="month">October 2026</th>"#));
        assert!(html.contains(r#"<th class="mon">Mon</th>"#));
        assert!(html.contains(r#"<th class="sun">Sun</th>"#));
    }

    #[test]
    fn test_week_view_renders_month() {
        let view = CalendarView::build(ym(2026, 10), ViewMode::Week, vec![], date(2026, 10, 16));
        assert_eq!(view.view, ViewMode::Week);
        assert_eq!(view.navigation.next.view, ViewMode::Week);
        assert_eq!(view.table_html.matches(r#"<span class="day-number">"#).count(), 31);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"<a href="x">Tom & Jerry's</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#x27;s&lt;/a&gt;");
    }
}
