//! Standard scores of one numeric column, drawn as diverging bars.

use log::debug;
use serde::Serialize;

use crate::error::{AppError, Result};

/// One bar of the diverging chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DivergingBar {
    pub label: String,
    pub value: f64,
    /// Distance from the mean in sample standard deviations
    pub z_score: f64,
}

impl DivergingBar {
    /// Bars below the mean are drawn red, the others green.
    pub fn is_below_mean(&self) -> bool {
        self.z_score < 0.0
    }
}

/// Z-scores of labelled values, sorted from the lowest score up.
///
/// The spread is the sample standard deviation (`n - 1` denominator). Ties
/// keep their input order.
///
/// # Errors
/// `MalformedData` with fewer than two values or when every value is the same.
pub fn diverging_bars(values: &[(String, f64)]) -> Result<Vec<DivergingBar>> {
    if values.len() < 2 {
        return Err(AppError::malformed(format!(
            "at least 2 values are needed for standard scores, got {}",
            values.len()
        )));
    }

    let n = values.len() as f64;
    let mean = values.iter().map(|(_, v)| v).sum::<f64>() / n;
    let variance = values.iter().map(|(_, v)| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let std_dev = variance.sqrt();
    if std_dev == 0.0 || !std_dev.is_finite() {
        return Err(AppError::malformed("the column has no spread to score"));
    }

    let mut bars: Vec<DivergingBar> = values
        .iter()
        .map(|(label, value)| DivergingBar {
            label: label.clone(),
            value: *value,
            z_score: (value - mean) / std_dev,
        })
        .collect();
    bars.sort_by(|a, b| a.z_score.total_cmp(&b.z_score));

    debug!("scored {} values, mean {} std {}", bars.len(), mean, std_dev);
    Ok(bars)
}
