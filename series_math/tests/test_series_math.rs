use approx::assert_relative_eq;
use rstest::rstest;
use series_math::{
    acf, bartlett_standard_errors, default_acf_lags, default_pacf_lags, difference, integrate,
    nelder_mead, pacf_ywm, MathError, NelderMeadConfig,
};

#[rstest]
#[case(1, 0)]
#[case(10, 9)]
#[case(36, 15)]
#[case(100, 20)]
fn test_default_acf_lags(#[case] n: usize, #[case] expected: usize) {
    assert_eq!(default_acf_lags(n), expected);
}

#[rstest]
#[case(3, 0)]
#[case(10, 4)]
#[case(36, 15)]
#[case(100, 20)]
fn test_default_pacf_lags(#[case] n: usize, #[case] expected: usize) {
    assert_eq!(default_pacf_lags(n), expected);
}

#[test]
fn test_difference_then_integrate_restores_tail() {
    let series = [3.0, 5.0, 9.0, 15.0, 23.0, 33.0];
    let second = difference(&series, 2).unwrap();
    assert_eq!(second, vec![2.0, 2.0, 2.0, 2.0]);

    // Continuing the constant second difference extends the quadratic
    let extended = integrate(&[2.0, 2.0], &series, 2).unwrap();
    assert_eq!(extended, vec![45.0, 59.0]);
}

#[test]
fn test_difference_too_short() {
    assert!(matches!(
        difference(&[1.0, 2.0], 2),
        Err(MathError::InsufficientData(_))
    ));
}

#[test]
fn test_pacf_of_ar1_cuts_off() {
    // x_t = 0.8 x_{t-1} + e_t with a deterministic pseudo-noise
    let mut series = Vec::with_capacity(400);
    let mut x = 0.0;
    let mut state: u64 = 12345;
    for _ in 0..400 {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let e = ((state >> 33) as f64 / (1u64 << 31) as f64) - 0.5;
        x = 0.8 * x + e;
        series.push(x);
    }

    let pacf = pacf_ywm(&series, 5).unwrap();
    assert_relative_eq!(pacf[0], 1.0);
    assert!((pacf[1] - 0.8).abs() < 0.1);
    for value in &pacf[2..] {
        assert!(value.abs() < 0.15);
    }

    let r = acf(&series, 5).unwrap();
    assert_relative_eq!(pacf[1], r[1], epsilon = 1e-12);
}

#[test]
fn test_constant_series_has_no_autocorrelation() {
    assert!(matches!(
        acf(&[4.0; 10], 3),
        Err(MathError::CalculationError(_))
    ));
}

#[test]
fn test_bartlett_errors_grow_with_lag() {
    let r = [1.0, 0.5, 0.25, 0.1];
    let se = bartlett_standard_errors(&r, 100);

    assert_eq!(se.len(), 4);
    assert_relative_eq!(se[0], 0.0);
    assert_relative_eq!(se[1], 0.1);
    assert_relative_eq!(se[2], (1.5f64 / 100.0).sqrt());
    assert!(se[3] > se[2]);
}

#[test]
fn test_nelder_mead_rosenbrock() {
    let rosenbrock = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
    let config = NelderMeadConfig {
        max_iter: 10_000,
        ..NelderMeadConfig::default()
    };

    let result = nelder_mead(rosenbrock, &[-1.2, 1.0], None, &config).unwrap();
    assert!(result.converged);
    assert!((result.optimal_point[0] - 1.0).abs() < 1e-2);
    assert!((result.optimal_point[1] - 1.0).abs() < 1e-2);
}

#[test]
fn test_nelder_mead_respects_bounds() {
    let objective = |x: &[f64]| (x[0] - 5.0).powi(2);
    let bounds = [(-0.99, 0.99)];

    let result = nelder_mead(objective, &[0.0], Some(&bounds[..]), &NelderMeadConfig::default()).unwrap();
    assert!(result.optimal_point[0] <= 0.99);
    assert!((result.optimal_point[0] - 0.99).abs() < 1e-6);
}
