//! Utility functions for the tourism_forecast crate

use crate::error::{ForecastError, Result};
use crate::period::Month;

/// Consecutive months following `last`, one per forecast step
pub fn future_months(last: Month, horizon: usize) -> Result<Vec<Month>> {
    (1..=horizon)
        .map(|step| {
            u32::try_from(step)
                .ok()
                .and_then(|n| last.plus(n))
                .ok_or_else(|| {
                    ForecastError::ValidationError(format!(
                        "Cannot label forecast step {} after {}",
                        step, last
                    ))
                })
        })
        .collect()
}

/// Parse a tourist count typed with `.` as the thousands separator
///
/// `"1.234.567"` becomes `1234567.0`. The count must be a finite,
/// non-negative number.
pub fn parse_count(raw: &str) -> Result<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '.').collect();
    if cleaned.is_empty() {
        return Err(ForecastError::ValidationError(
            "The number of tourists must not be empty.".to_string(),
        ));
    }

    let value: f64 = cleaned.parse().map_err(|_| {
        ForecastError::ValidationError(format!(
            "'{}' is not a number. Use '.' only as a thousands separator.",
            raw.trim()
        ))
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(ForecastError::ValidationError(format!(
            "The number of tourists must be a non-negative number, got '{}'",
            raw.trim()
        )));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1.234", 1234.0)]
    #[case("2.345.678", 2_345_678.0)]
    #[case(" 980 ", 980.0)]
    #[case("0", 0.0)]
    fn test_parse_count(#[case] raw: &str, #[case] expected: f64) {
        assert_eq!(parse_count(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("12,5")]
    #[case("-10")]
    #[case("inf")]
    #[case("NaN")]
    fn test_parse_count_rejects(#[case] raw: &str) {
        assert!(matches!(parse_count(raw), Err(ForecastError::ValidationError(_))));
    }

    #[test]
    fn test_future_months() {
        let last = Month::new(2023, 11).unwrap();
        let labels: Vec<String> = future_months(last, 3)
            .unwrap()
            .iter()
            .map(|m| m.to_string())
            .collect();
        assert_eq!(labels, vec!["2023-12", "2024-01", "2024-02"]);
        assert!(future_months(last, 0).unwrap().is_empty());
    }
}
