//! Coercion of loosely formatted dates into ISO 8601 prefixes

use chrono::NaiveDate;
use std::fmt;

/// A date with optional month and day precision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialDate {
    pub year: i32,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

impl PartialDate {
    /// Parse `YYYY`, `YYYY-MM` or `YYYY-MM-DD` (also with `/` or `.`
    /// separators, or compact `YYYYMMDD`), dropping invalid trailing parts.
    ///
    /// An invalid day is dropped when the month is valid; an invalid month
    /// drops both month and day. Returns `None` when the year is invalid.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let raw = raw.split(['T', ' ']).next().unwrap_or(raw);

        let parts: Vec<&str> = if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
            vec![&raw[0..4], &raw[4..6], &raw[6..8]]
        } else if raw.len() == 6 && raw.bytes().all(|b| b.is_ascii_digit()) {
            vec![&raw[0..4], &raw[4..6]]
        } else {
            raw.split(['-', '/', '.']).collect()
        };

        let year = parts
            .first()
            .filter(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|y| y.parse::<i32>().ok())
            .filter(|&y| y > 0)?;

        let month = parts
            .get(1)
            .and_then(|m| parse_component(m))
            .filter(|m| (1..=12).contains(m));

        let day = month.and_then(|m| {
            parts
                .get(2)
                .and_then(|d| parse_component(d))
                .filter(|&d| NaiveDate::from_ymd_opt(year, m, d).is_some())
        });

        Some(Self { year, month, day })
    }
}

fn parse_component(s: &str) -> Option<u32> {
    if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl fmt::Display for PartialDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.year)?;
        if let Some(month) = self.month {
            write!(f, "-{:02}", month)?;
            if let Some(day) = self.day {
                write!(f, "-{:02}", day)?;
            }
        }
        Ok(())
    }
}

/// Coerce a loose date string into its longest valid ISO prefix
pub fn coerce_date(raw: &str) -> Option<String> {
    PartialDate::parse(raw).map(|date| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_dates() {
        assert_eq!(coerce_date("2004").as_deref(), Some("2004"));
        assert_eq!(coerce_date("2004-03").as_deref(), Some("2004-03"));
        assert_eq!(coerce_date("2004-03-15").as_deref(), Some("2004-03-15"));
        assert_eq!(coerce_date("2004-3-5").as_deref(), Some("2004-03-05"));
        assert_eq!(coerce_date(" 2004/03/15 ").as_deref(), Some("2004-03-15"));
        assert_eq!(coerce_date("20040315").as_deref(), Some("2004-03-15"));
        assert_eq!(coerce_date("2004-03-15T10:11:12").as_deref(), Some("2004-03-15"));
    }

    #[test]
    fn test_invalid_day_is_dropped() {
        assert_eq!(coerce_date("2004-02-30").as_deref(), Some("2004-02"));
        assert_eq!(coerce_date("2004-02-00").as_deref(), Some("2004-02"));
        assert_eq!(coerce_date("2003-02-29").as_deref(), Some("2003-02"));
        assert_eq!(coerce_date("2004-02-29").as_deref(), Some("2004-02-29"));
    }

    #[test]
    fn test_invalid_month_drops_month_and_day() {
        assert_eq!(coerce_date("2004-00-00").as_deref(), Some("2004"));
        assert_eq!(coerce_date("2004-13-01").as_deref(), Some("2004"));
        assert_eq!(coerce_date("2004-xx-10").as_deref(), Some("2004"));
    }

    #[test]
    fn test_invalid_year_fails() {
        assert_eq!(coerce_date(""), None);
        assert_eq!(coerce_date("0000-01-01"), None);
        assert_eq!(coerce_date("04-01-01"), None);
        assert_eq!(coerce_date("March 2004"), None);
    }
}
