use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::db::queries;
use crate::errors::AppError;
use crate::handlers::auth::require_staff;
use crate::handlers::now;
use crate::models::{ViewMode, YearMonth};
use crate::services::calendar::{escape_html, CalendarView};
use crate::state::AppState;

static CALENDAR_HTML: &str = include_str!("../web/calendar.html");

#[derive(Debug, Default, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<String>,
    pub month: Option<String>,
    pub view: Option<String>,
}

impl CalendarQuery {
    /// Missing values default to the current month and the month view.
    fn resolve(&self, today: NaiveDate) -> Result<(YearMonth, ViewMode), AppError> {
        let current = YearMonth::of(today);
        let year = match self.year.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|_| AppError::Validation(format!("year: '{raw}' is not a number")))?,
            None => current.year(),
        };
        let month = match self.month.as_deref() {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .map_err(|_| AppError::Validation(format!("month: '{raw}' is not a number")))?,
            None => current.month(),
        };
        let view = self.view.as_deref().map(ViewMode::parse).unwrap_or_default();

        Ok((YearMonth::new(year, month)?, view))
    }
}

// GET /bookings
pub async fn calendar_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<CalendarQuery>,
) -> Result<Html<String>, AppError> {
    require_staff(&headers, &state.config.admin_token)?;

    let today = now().date();
    let (month, view) = query.resolve(today)?;

    let bookings = {
        let db = state.conn()?;
        queries::get_bookings_for_month(&db, month)?
    };
    tracing::debug!(
        year = month.year(),
        month = month.month(),
        count = bookings.len(),
        "rendering calendar"
    );

    let calendar = CalendarView::build(month, view, bookings, today);
    Ok(Html(render_page(&calendar)))
}

fn render_page(calendar: &CalendarView) -> String {
    let nav = &calendar.navigation;
    CALENDAR_HTML
        .replace("{{month_name}}", &escape_html(&nav.label))
        .replace("{{view}}", calendar.view.as_str())
        .replace("{{prev_month_url}}", &escape_html(&nav.prev.to_query_string()))
        .replace("{{next_month_url}}", &escape_html(&nav.next.to_query_string()))
        .replace("{{today_url}}", &escape_html(&nav.today.to_query_string()))
        .replace("{{month_view_url}}", &escape_html(&nav.month_view.to_query_string()))
        .replace("{{week_view_url}}", &escape_html(&nav.week_view.to_query_string()))
        .replace("{{day_view_url}}", &escape_html(&nav.day_view.to_query_string()))
        .replace("{{calendar}}", &calendar.table_html)
}
