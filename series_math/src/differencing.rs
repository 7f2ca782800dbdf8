//! Differencing and integration for integrated (the "I" in ARIMA) series

use crate::{MathError, Result};

/// Apply first differences `d` times
///
/// Each pass shortens the series by one, so the series must hold more than
/// `d` values.
pub fn difference(series: &[f64], d: usize) -> Result<Vec<f64>> {
    if series.len() <= d {
        return Err(MathError::InsufficientData(format!(
            "Differencing of order {} needs more than {} values, got {}",
            d,
            d,
            series.len()
        )));
    }

    let mut result = series.to_vec();
    for _ in 0..d {
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    Ok(result)
}

/// Undo `d` rounds of differencing for values that continue `original`
///
/// `differenced` holds values on the `d`-th difference scale that follow the
/// end of `original`. The last value of every intermediate difference of
/// `original` seeds the cumulative sums.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Result<Vec<f64>> {
    if d == 0 || differenced.is_empty() {
        return Ok(differenced.to_vec());
    }
    if original.len() <= d {
        return Err(MathError::InsufficientData(format!(
            "Integration of order {} needs more than {} original values, got {}",
            d,
            d,
            original.len()
        )));
    }

    let mut result = differenced.to_vec();
    for level in (0..d).rev() {
        let anchor = difference(original, level)?
            .last()
            .copied()
            .ok_or_else(|| MathError::CalculationError("Empty intermediate difference".to_string()))?;

        let mut level_values = Vec::with_capacity(result.len());
        let mut running = anchor;
        for value in &result {
            running += value;
            level_values.push(running);
        }
        result = level_values;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_first_difference() {
        let diff = difference(&[1.0, 4.0, 9.0, 16.0], 1).unwrap();
        assert_eq!(diff, vec![3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_second_difference() {
        let diff = difference(&[1.0, 4.0, 9.0, 16.0], 2).unwrap();
        assert_eq!(diff, vec![2.0, 2.0]);
    }

    #[test]
    fn test_zero_order_is_identity() {
        let series = [5.0, 3.0];
        assert_eq!(difference(&series, 0).unwrap(), series.to_vec());
    }

    #[test]
    fn test_difference_too_short() {
        assert!(matches!(
            difference(&[1.0, 2.0], 2),
            Err(MathError::InsufficientData(_))
        ));
    }

    #[test]
    fn test_integrate_first_order() {
        // Continuing 1, 4, 9, 16 with differences 9 and 11
        let restored = integrate(&[9.0, 11.0], &[1.0, 4.0, 9.0, 16.0], 1).unwrap();
        assert_relative_eq!(restored[0], 25.0);
        assert_relative_eq!(restored[1], 36.0);
    }

    #[test]
    fn test_integrate_second_order() {
        // Squares have a constant second difference of 2
        let restored = integrate(&[2.0, 2.0], &[1.0, 4.0, 9.0, 16.0], 2).unwrap();
        assert_relative_eq!(restored[0], 25.0);
        assert_relative_eq!(restored[1], 36.0);
    }
}
