//! Tests for curve sampling and polynomial interpolation.
//!
//! ## Test Organization
//!
//! 1. **Sampling** - count, spacing and end points of the sine samples
//! 2. **Fitting** - least-squares quality and the degenerate high-degree case
//! 3. **Evaluation** - Horner evaluation and error reporting
//! 4. **Parameters** - slider ranges and the series bundle

use approx::{assert_abs_diff_eq, assert_relative_eq};
use std::f64::consts::PI;

use datapages::interpolation::{
    CURVE_RESOLUTION, InterpolationParams, InterpolationPlot, PolynomialFit, compute_error,
    evaluate, fit_polynomial, generate_samples,
};

// ============================================================================
// Sampling Tests
// ============================================================================

#[test]
fn test_generate_samples_for_every_valid_count() {
    for n in 4..=15 {
        let samples = generate_samples(n);
        let xs = samples.xs();

        assert_eq!(samples.count(), n);
        assert_eq!(xs.len(), n);
        assert_eq!(xs[0], 0.0);
        assert_abs_diff_eq!(xs[n - 1], 2.0 * PI, epsilon = 1e-12);

        let step = 2.0 * PI / (n - 1) as f64;
        for pair in xs.windows(2) {
            assert!(pair[1] > pair[0], "x values must increase");
            assert_abs_diff_eq!(pair[1] - pair[0], step, epsilon = 1e-12);
        }
        for &(x, y) in samples.points() {
            assert_eq!(y, x.sin());
        }
    }
    println!("✓ samples are evenly spaced over [0, 2π] for counts 4 to 15");
}

// ============================================================================
// Fitting Tests
// ============================================================================

#[test]
fn test_fit_has_degree_plus_one_coefficients() {
    let samples = generate_samples(6);
    for degree in [0, 1, 3, 5, 8, 30] {
        let fit = fit_polynomial(&samples, degree);
        assert_eq!(fit.degree(), degree);
        assert_eq!(fit.coefficients().len(), degree + 1);
        assert!(fit.coefficients().iter().all(|c| c.is_finite()));
    }
    println!("✓ coefficient vector length matches degree + 1");
}

#[test]
fn test_low_degree_fit_tracks_samples() {
    let samples = generate_samples(12);
    let fit = fit_polynomial(&samples, 7);

    for &(x, y) in samples.points() {
        assert_abs_diff_eq!(evaluate(&fit, x), y, epsilon = 1e-2);
    }
    println!("✓ degree 7 fit stays within 0.01 of 12 samples");
}

#[test]
fn test_constant_fit_is_sample_mean() {
    let samples = generate_samples(5);
    let fit = fit_polynomial(&samples, 0);
    let mean = samples.ys().iter().sum::<f64>() / 5.0;

    assert_abs_diff_eq!(fit.coefficients()[0], mean, epsilon = 1e-12);
    println!("✓ degree 0 fit is the mean of the samples");
}

#[test]
fn test_linear_fit_recovers_a_line() {
    // A least-squares line through sin samples symmetric about π has slope
    // and intercept that make it pass through (π, 0).
    let samples = generate_samples(9);
    let fit = fit_polynomial(&samples, 1);

    assert_abs_diff_eq!(evaluate(&fit, PI), 0.0, epsilon = 1e-9);
    assert!(fit.coefficients()[0] < 0.0);
    println!("✓ degree 1 fit passes through (π, 0) with a negative slope");
}

#[test]
fn test_degenerate_fit_interpolates_every_sample() {
    // 6 samples and degree 8: more coefficients than points
    let samples = generate_samples(6);
    let fit = fit_polynomial(&samples, 8);

    for &(x, y) in samples.points() {
        assert_abs_diff_eq!(evaluate(&fit, x), y, epsilon = 1e-6);
    }
    println!("✓ degree 8 fit through 6 samples reproduces every sample");
}

#[test]
fn test_exact_degree_fit_interpolates() {
    let samples = generate_samples(7);
    let fit = fit_polynomial(&samples, 6);

    for &(x, y) in samples.points() {
        assert_abs_diff_eq!(evaluate(&fit, x), y, epsilon = 1e-6);
    }
    println!("✓ degree n-1 fit is an exact interpolation");
}

// ============================================================================
// Evaluation Tests
// ============================================================================

#[test]
fn test_horner_evaluation() {
    // 2x² - 3x + 1
    let fit = PolynomialFit::from_coefficients(vec![2.0, -3.0, 1.0]);
    assert_eq!(evaluate(&fit, 0.0), 1.0);
    assert_eq!(evaluate(&fit, 1.0), 0.0);
    assert_eq!(evaluate(&fit, 2.0), 3.0);
    assert_eq!(evaluate(&fit, -1.0), 6.0);
    println!("✓ Horner evaluation of 2x² - 3x + 1");
}

#[test]
fn test_compute_error_reference_points() {
    let fit = fit_polynomial(&generate_samples(10), 7);

    let at_zero = compute_error(&fit, 0.0);
    assert_abs_diff_eq!(at_zero.true_y, 0.0, epsilon = 1e-6);
    assert_eq!(at_zero.queried_x, 0.0);

    let at_half_pi = compute_error(&fit, PI / 2.0);
    assert_abs_diff_eq!(at_half_pi.true_y, 1.0, epsilon = 1e-6);
    assert_relative_eq!(
        at_half_pi.absolute_error,
        (at_half_pi.interpolated_y - at_half_pi.true_y).abs()
    );
    println!("✓ true values at 0 and π/2 are 0 and 1");
}

#[test]
fn test_rounded_result_has_four_decimals() {
    let fit = PolynomialFit::from_coefficients(vec![0.123456789]);
    let rounded = compute_error(&fit, 1.3).rounded();

    assert_eq!(rounded.interpolated_y, 0.1235);
    assert_eq!(rounded.true_y, 0.9636);
    assert_eq!(rounded.queried_x, 1.3);
    println!("✓ displayed values are rounded to 4 decimals");
}

// ============================================================================
// Parameter & Plot Tests
// ============================================================================

#[test]
fn test_default_params_match_sliders() {
    let params = InterpolationParams::default();
    assert_eq!(params.samples, 6);
    assert_eq!(params.degree, 8);
    assert_eq!(params.x, 1.3);
    assert!(!params.show_fit);
    assert!(params.validate().is_ok());
    println!("✓ default parameters are valid");
}

#[test]
fn test_params_out_of_range() {
    let cases = [
        InterpolationParams { samples: 3, ..Default::default() },
        InterpolationParams { samples: 16, ..Default::default() },
        InterpolationParams { degree: 31, ..Default::default() },
        InterpolationParams { x: -0.1, ..Default::default() },
        InterpolationParams { x: 6.3, ..Default::default() },
        InterpolationParams { x: f64::NAN, ..Default::default() },
    ];
    for params in cases {
        assert!(params.validate().is_err(), "{:?} should be rejected", params);
    }
    println!("✓ out of range parameters are rejected");
}

#[test]
fn test_params_deserialize_with_defaults() {
    let params: InterpolationParams = serde_json::from_str(r#"{"degree": 3}"#).unwrap();
    assert_eq!(params.degree, 3);
    assert_eq!(params.samples, 6);
    println!("✓ missing parameters fall back to defaults");
}

#[test]
fn test_plot_bundle() {
    let samples = generate_samples(6);
    let fit = fit_polynomial(&samples, 3);

    let hidden = InterpolationPlot::build(&samples, &fit, 2.0, false);
    assert!(hidden.fitted_curve.is_none());
    assert_eq!(hidden.samples.len(), 6);
    assert_eq!(hidden.marker_x, 2.0);
    assert_relative_eq!(hidden.highlight.1, evaluate(&fit, 2.0));

    let shown = InterpolationPlot::build(&samples, &fit, 2.0, true);
    let curve = shown.fitted_curve.unwrap();
    assert_eq!(curve.len(), CURVE_RESOLUTION);
    assert_eq!(curve[0].0, 0.0);
    assert_abs_diff_eq!(curve[CURVE_RESOLUTION - 1].0, 2.0 * PI, epsilon = 1e-12);
    println!("✓ plot bundle carries samples, curve, highlight and marker");
}
