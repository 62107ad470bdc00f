use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month. Always holds a representable first-of-month date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthError {
    #[error("month must be between 1 and 12, got {0}")]
    Month(u32),
    #[error("year must be between 1 and 9999, got {0}")]
    Year(i32),
}

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 9999;

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        if !(1..=12).contains(&month) {
            return Err(MonthError::Month(month));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(MonthError::Year(year));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // Construction guarantees a valid date.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn days(&self) -> u32 {
        let next_first = match self.month {
            12 => NaiveDate::from_ymd_opt(self.year + 1, 1, 1),
            m => NaiveDate::from_ymd_opt(self.year, m + 1, 1),
        };
        next_first
            .and_then(|d| d.pred_opt())
            .map(|d| d.day())
            .unwrap_or(31)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Previous month. Saturates at January of the first supported year.
    pub fn pred(&self) -> Self {
        match (self.year, self.month) {
            (MIN_YEAR, 1) => *self,
            (y, 1) => Self { year: y - 1, month: 12 },
            (y, m) => Self { year: y, month: m - 1 },
        }
    }

    /// Next month. Saturates at December of the last supported year.
    pub fn succ(&self) -> Self {
        match (self.year, self.month) {
            (MAX_YEAR, 12) => *self,
            (y, 12) => Self { year: y + 1, month: 1 },
            (y, m) => Self { year: y, month: m + 1 },
        }
    }

    /// Human readable label, e.g. "October 2026".
    pub fn label(&self) -> String {
        self.first_day().format("%B %Y").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Month,
    Week,
    Day,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Month => "month",
            ViewMode::Week => "week",
            ViewMode::Day => "day",
        }
    }

    /// Unknown values fall back to the month view.
    pub fn parse(s: &str) -> Self {
        match s {
            "week" => ViewMode::Week,
            "day" => ViewMode::Day,
            _ => ViewMode::Month,
        }
    }
}

/// Query parameters for one navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavParams {
    pub year: i32,
    pub month: u32,
    pub view: ViewMode,
}

impl NavParams {
    pub fn new(month: YearMonth, view: ViewMode) -> Self {
        Self {
            year: month.year(),
            month: month.month(),
            view,
        }
    }

    pub fn to_query_string(&self) -> String {
        format!(
            "?year={}&month={}&view={}",
            self.year,
            self.month,
            self.view.as_str()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub label: String,
    pub prev: NavParams,
    pub next: NavParams,
    pub today: NavParams,
    pub month_view: NavParams,
    pub week_view: NavParams,
    pub day_view: NavParams,
}

impl Navigation {
    pub fn new(shown: YearMonth, view: ViewMode, today: NaiveDate) -> Self {
        Self {
            label: shown.label(),
            prev: NavParams::new(shown.pred(), view),
            next: NavParams::new(shown.succ(), view),
            today: NavParams::new(YearMonth::of(today), view),
            month_view: NavParams::new(shown, ViewMode::Month),
            week_view: NavParams::new(shown, ViewMode::Week),
            day_view: NavParams::new(shown, ViewMode::Day),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn test_rejects_out_of_range() {
        assert_eq!(YearMonth::new(2026, 13), Err(MonthError::Month(13)));
        assert_eq!(YearMonth::new(2026, 0), Err(MonthError::Month(0)));
        assert_eq!(YearMonth::new(0, 5), Err(MonthError::Year(0)));
        assert_eq!(YearMonth::new(10000, 5), Err(MonthError::Year(10000)));
    }

    #[test]
    fn test_pred_succ_wrap_year() {
        assert_eq!(ym(2026, 1).pred(), ym(2025, 12));
        assert_eq!(ym(2026, 12).succ(), ym(2027, 1));
        assert_eq!(ym(2026, 6).pred(), ym(2026, 5));
        assert_eq!(ym(2026, 6).succ(), ym(2026, 7));
    }

    #[test]
    fn test_pred_succ_saturate_at_bounds() {
        assert_eq!(ym(1, 1).pred(), ym(1, 1));
        assert_eq!(ym(9999, 12).succ(), ym(9999, 12));
    }

    #[test]
    fn test_days() {
        assert_eq!(ym(2024, 2).days(), 29);
        assert_eq!(ym(2026, 2).days(), 28);
        assert_eq!(ym(2026, 4).days(), 30);
        assert_eq!(ym(2026, 12).days(), 31);
        assert_eq!(ym(9999, 12).days(), 31);
    }

    #[test]
    fn test_label() {
        assert_eq!(ym(2026, 10).label(), "October 2026");
    }

    #[test]
    fn test_view_mode_parse() {
        assert_eq!(ViewMode::parse("week"), ViewMode::Week);
        assert_eq!(ViewMode::parse("day"), ViewMode::Day);
        assert_eq!(ViewMode::parse("year"), ViewMode::Month);
    }

    #[test]
    fn test_navigation_keeps_view() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let nav = Navigation::new(ym(2026, 1), ViewMode::Week, today);

        assert_eq!(nav.label, "January 2026");
        assert_eq!(nav.prev.to_query_string(), "?year=2025&month=12&view=week");
        assert_eq!(nav.next.to_query_string(), "?year=2026&month=2&view=week");
        assert_eq!(nav.today.to_query_string(), "?year=2026&month=10&view=week");
        assert_eq!(nav.month_view.to_query_string(), "?year=2026&month=1&view=month");
        assert_eq!(nav.day_view.view, ViewMode::Day);
    }
}
