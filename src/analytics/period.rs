use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Reporting period of an analytics report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    Today,
    Week,
    Month,
    Year,
}

impl AnalyticsPeriod {
    /// Parse a period name; anything unrecognised means `Today`
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "week" => AnalyticsPeriod::Week,
            "month" => AnalyticsPeriod::Month,
            "year" => AnalyticsPeriod::Year,
            _ => AnalyticsPeriod::Today,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsPeriod::Today => "today",
            AnalyticsPeriod::Week => "week",
            AnalyticsPeriod::Month => "month",
            AnalyticsPeriod::Year => "year",
        }
    }

    /// Midnight that opens the window containing `now`.
    /// Weeks start on Monday.
    pub fn window_start(&self, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date();
        let first_day = match self {
            AnalyticsPeriod::Today => today,
            AnalyticsPeriod::Week => {
                today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
            }
            AnalyticsPeriod::Month => today.with_day(1).unwrap_or(today),
            AnalyticsPeriod::Year => {
                NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today)
            }
        };
        first_day.and_time(NaiveTime::MIN)
    }
}

impl std::fmt::Display for AnalyticsPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_parse_known_and_unknown() {
        assert_eq!(AnalyticsPeriod::parse_lenient("week"), AnalyticsPeriod::Week);
        assert_eq!(AnalyticsPeriod::parse_lenient("month"), AnalyticsPeriod::Month);
        assert_eq!(AnalyticsPeriod::parse_lenient("year"), AnalyticsPeriod::Year);
        assert_eq!(AnalyticsPeriod::parse_lenient("today"), AnalyticsPeriod::Today);
        assert_eq!(AnalyticsPeriod::parse_lenient("fortnight"), AnalyticsPeriod::Today);
        assert_eq!(AnalyticsPeriod::parse_lenient("WEEK"), AnalyticsPeriod::Today);
        assert_eq!(AnalyticsPeriod::parse_lenient(""), AnalyticsPeriod::Today);
    }

    #[test]
    fn test_today_starts_at_midnight() {
        let now = at(2024, 6, 13, 15, 42, 7);
        assert_eq!(AnalyticsPeriod::Today.window_start(now), at(2024, 6, 13, 0, 0, 0));
    }

    #[test]
    fn test_week_starts_on_monday() {
        // 2024-06-13 is a Thursday
        let thursday = at(2024, 6, 13, 15, 42, 7);
        assert_eq!(AnalyticsPeriod::Week.window_start(thursday), at(2024, 6, 10, 0, 0, 0));

        let monday = at(2024, 6, 10, 0, 0, 1);
        assert_eq!(AnalyticsPeriod::Week.window_start(monday), at(2024, 6, 10, 0, 0, 0));

        let sunday = at(2024, 6, 16, 23, 59, 59);
        assert_eq!(AnalyticsPeriod::Week.window_start(sunday), at(2024, 6, 10, 0, 0, 0));
    }

    #[test]
    fn test_week_crosses_month_boundary() {
        // Saturday 2024-06-01 belongs to the week of Monday 2024-05-27
        let saturday = at(2024, 6, 1, 12, 0, 0);
        assert_eq!(AnalyticsPeriod::Week.window_start(saturday), at(2024, 5, 27, 0, 0, 0));
    }

    #[test]
    fn test_month_and_year_starts() {
        let now = at(2024, 2, 29, 8, 0, 0);
        assert_eq!(AnalyticsPeriod::Month.window_start(now), at(2024, 2, 1, 0, 0, 0));
        assert_eq!(AnalyticsPeriod::Year.window_start(now), at(2024, 1, 1, 0, 0, 0));
    }
}
