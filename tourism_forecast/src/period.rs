//! Calendar months used as the time index of the dataset

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt;

/// A calendar month, stored as the first day of that month
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    /// Build a month from a year and a 1-based month number
    pub fn new(year: i32, month: u32) -> Result<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Month)
            .ok_or_else(|| {
                ForecastError::ValidationError(format!("{}-{} is not a valid month", year, month))
            })
    }

    /// Parse a user-entered `YYYY-MM` label
    ///
    /// The month may have one or two digits; anything else (extra parts,
    /// a day component, month 13) is rejected.
    pub fn parse_label(label: &str) -> Result<Self> {
        let invalid = || {
            ForecastError::ValidationError(
                "Wrong time format. Make sure it is YYYY-MM, for example 2024-03.".to_string(),
            )
        };

        let (year, month) = label.trim().split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if month.is_empty() || month.len() > 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }

    /// Parse a stored label, accepting `YYYY-MM`, `YYYY-MM-DD`, `YYYY/MM` and `YYYY/MM/DD`
    ///
    /// Returns `None` for anything unparseable; the day of month is discarded.
    pub fn parse_lenient(label: &str) -> Option<Self> {
        let label = label.trim();
        for format in ["%Y-%m-%d", "%Y/%m/%d"] {
            if let Ok(date) = NaiveDate::parse_from_str(label, format) {
                return Some(Month::from_date(date));
            }
        }

        let normalized = label.replace('/', "-");
        Month::parse_label(&normalized).ok()
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Month(date.with_day(1).unwrap_or(date))
    }

    /// The month `n` months after this one
    pub fn plus(&self, n: u32) -> Option<Self> {
        self.0.checked_add_months(Months::new(n)).map(Month)
    }

    /// The following month
    pub fn succ(&self) -> Option<Self> {
        self.plus(1)
    }

    /// First day of the month
    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-03", 2024, 3)]
    #[case("2024-3", 2024, 3)]
    #[case(" 2019-12 ", 2019, 12)]
    fn test_parse_label_accepts(#[case] label: &str, #[case] year: i32, #[case] month: u32) {
        let parsed = Month::parse_label(label).unwrap();
        assert_eq!(parsed.year(), year);
        assert_eq!(parsed.month(), month);
    }

    #[rstest]
    #[case("2024-13")]
    #[case("2024-00")]
    #[case("2024-03-01")]
    #[case("24-03")]
    #[case("March 2024")]
    #[case("")]
    fn test_parse_label_rejects(#[case] label: &str) {
        assert!(matches!(
            Month::parse_label(label),
            Err(ForecastError::ValidationError(_))
        ));
    }

    #[rstest]
    #[case("2024-03-17")]
    #[case("2024/03")]
    #[case("2024/03/31")]
    #[case("2024-03")]
    fn test_parse_lenient_normalizes_to_month(#[case] label: &str) {
        assert_eq!(Month::parse_lenient(label), Some(Month::new(2024, 3).unwrap()));
    }

    #[test]
    fn test_parse_lenient_rejects_garbage() {
        assert_eq!(Month::parse_lenient("not a month"), None);
        assert_eq!(Month::parse_lenient("2024-13"), None);
    }

    #[test]
    fn test_month_arithmetic_crosses_year() {
        let november = Month::new(2023, 11).unwrap();
        assert_eq!(november.succ().unwrap().to_string(), "2023-12");
        assert_eq!(november.plus(3).unwrap().to_string(), "2024-02");
    }
}
