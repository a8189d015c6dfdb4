//! Curve sampling and least-squares polynomial interpolation.
//!
//! Samples `sin(x)` on `[0, 2π]`, fits a polynomial of a chosen degree to the
//! samples and reports how far the fit is from the true curve at a query point.

use log::{debug, warn};
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{AppError, Result};

/// Number of points of the dense grid the fitted curve is drawn on.
pub const CURVE_RESOLUTION: usize = 100;

/// Decimals used when the values are shown to the user.
pub const DISPLAY_DECIMALS: u32 = 4;

/// Evenly spaced samples of the sine curve over `[0, 2π]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SampleSet {
    points: Vec<(f64, f64)>,
}

impl SampleSet {
    /// Number of samples
    pub fn count(&self) -> usize {
        self.points.len()
    }

    /// Sample points in increasing x order
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|&(x, _)| x).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|&(_, y)| y).collect()
    }
}

/// Coefficients of a fitted polynomial, highest power first.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PolynomialFit {
    coefficients: Vec<f64>,
}

impl PolynomialFit {
    /// Builds a fit from coefficients ordered from the highest power down.
    ///
    /// An empty slice is treated as the zero polynomial.
    pub fn from_coefficients(coefficients: Vec<f64>) -> Self {
        if coefficients.is_empty() {
            return Self {
                coefficients: vec![0.0],
            };
        }
        Self { coefficients }
    }

    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

/// Fit value, true value and their distance at one query point.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub queried_x: f64,
    pub interpolated_y: f64,
    pub true_y: f64,
    pub absolute_error: f64,
}

impl EvaluationResult {
    /// Same result with every value rounded to the display precision.
    pub fn rounded(&self) -> Self {
        Self {
            queried_x: round_to(self.queried_x, DISPLAY_DECIMALS),
            interpolated_y: round_to(self.interpolated_y, DISPLAY_DECIMALS),
            true_y: round_to(self.true_y, DISPLAY_DECIMALS),
            absolute_error: round_to(self.absolute_error, DISPLAY_DECIMALS),
        }
    }
}

/// Input of the interpolation page.
///
/// Defaults follow the sliders of the page: 6 samples, degree 8, x = 1.3.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationParams {
    pub samples: usize,
    pub degree: usize,
    pub x: f64,
    pub show_fit: bool,
}

impl Default for InterpolationParams {
    fn default() -> Self {
        Self {
            samples: 6,
            degree: 8,
            x: 1.3,
            show_fit: false,
        }
    }
}

impl InterpolationParams {
    pub const SAMPLES_RANGE: (usize, usize) = (4, 15);
    pub const DEGREE_RANGE: (usize, usize) = (0, 30);
    pub const X_RANGE: (f64, f64) = (0.0, 6.2);

    /// Checks every field against the ranges of the page sliders.
    pub fn validate(&self) -> Result<()> {
        let (min, max) = Self::SAMPLES_RANGE;
        if !(min..=max).contains(&self.samples) {
            return Err(AppError::malformed(format!(
                "number of samples must be between {} and {}, got {}",
                min, max, self.samples
            )));
        }

        let (min, max) = Self::DEGREE_RANGE;
        if !(min..=max).contains(&self.degree) {
            return Err(AppError::malformed(format!(
                "polynomial degree must be between {} and {}, got {}",
                min, max, self.degree
            )));
        }

        let (min, max) = Self::X_RANGE;
        if !self.x.is_finite() || self.x < min || self.x > max {
            return Err(AppError::malformed(format!(
                "x value must be between {} and {}, got {}",
                min, max, self.x
            )));
        }

        Ok(())
    }
}

/// Series handed to the renderer for the interpolation chart.
#[derive(Clone, Debug, Serialize)]
pub struct InterpolationPlot {
    /// The sampled sine curve
    pub samples: Vec<(f64, f64)>,
    /// The fit evaluated on a dense grid, absent when the fit is hidden
    pub fitted_curve: Option<Vec<(f64, f64)>>,
    /// The query point on the fitted polynomial
    pub highlight: (f64, f64),
    /// x position of the vertical marker
    pub marker_x: f64,
}

impl InterpolationPlot {
    pub fn build(samples: &SampleSet, fit: &PolynomialFit, x: f64, show_fit: bool) -> Self {
        let fitted_curve = show_fit.then(|| {
            linspace(0.0, 2.0 * PI, CURVE_RESOLUTION)
                .into_iter()
                .map(|grid_x| (grid_x, evaluate(fit, grid_x)))
                .collect()
        });

        Self {
            samples: samples.points().to_vec(),
            fitted_curve,
            highlight: (x, evaluate(fit, x)),
            marker_x: x,
        }
    }
}

/// Samples `sin(x)` at `count` evenly spaced points over `[0, 2π]`.
pub fn generate_samples(count: usize) -> SampleSet {
    let points = linspace(0.0, 2.0 * PI, count)
        .into_iter()
        .map(|x| (x, x.sin()))
        .collect();
    SampleSet { points }
}

/// Least-squares polynomial fit of the given degree.
///
/// The Vandermonde columns are scaled to unit norm and the system is solved
/// through an SVD, so a degree at or above the sample count yields the
/// minimum-norm polynomial through every sample instead of failing.
pub fn fit_polynomial(samples: &SampleSet, degree: usize) -> PolynomialFit {
    let n = samples.count();
    let order = degree + 1;

    if n == 0 {
        return PolynomialFit::from_coefficients(vec![0.0; order]);
    }
    if order > n {
        warn!(
            "polynomial degree {} with {} samples is rank deficient, the fit interpolates every sample",
            degree, n
        );
    }

    // Column j holds x^(degree - j), matching the highest-power-first layout
    let mut design = DMatrix::from_fn(n, order, |row, col| {
        samples.points[row].0.powi((degree - col) as i32)
    });
    let scales: Vec<f64> = design
        .column_iter()
        .map(|column| {
            let norm = column.norm();
            if norm > 0.0 { norm } else { 1.0 }
        })
        .collect();
    for (col, scale) in scales.iter().enumerate() {
        design.column_mut(col).scale_mut(1.0 / scale);
    }

    let rhs = DVector::from_iterator(n, samples.points.iter().map(|&(_, y)| y));
    let svd = design.svd(true, true);
    let max_singular = svd.singular_values.max();
    let cutoff = max_singular * n as f64 * f64::EPSILON;

    let coefficients = match svd.solve(&rhs, cutoff) {
        Ok(solution) => solution
            .iter()
            .zip(&scales)
            .map(|(c, scale)| c / scale)
            .collect(),
        Err(message) => {
            warn!("least-squares solve failed ({}), using the zero polynomial", message);
            vec![0.0; order]
        }
    };

    debug!("fitted degree {} polynomial to {} samples", degree, n);
    PolynomialFit { coefficients }
}

/// Evaluates the polynomial at `x` with Horner's method.
pub fn evaluate(fit: &PolynomialFit, x: f64) -> f64 {
    fit.coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Compares the fit with the true sine value at `x`.
pub fn compute_error(fit: &PolynomialFit, x: f64) -> EvaluationResult {
    let interpolated_y = evaluate(fit, x);
    let true_y = x.sin();
    EvaluationResult {
        queried_x: x,
        interpolated_y,
        true_y,
        absolute_error: (interpolated_y - true_y).abs(),
    }
}

/// `count` evenly spaced values over `[start, stop]`, both ends included.
pub fn linspace(start: f64, stop: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
            values[count - 1] = stop;
            values
        }
    }
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
