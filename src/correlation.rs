//! Correlation heatmap over a randomly generated table.

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::error::{AppError, Result};

/// Rows of the generated table.
pub const DEFAULT_ROWS: usize = 10;

/// Column letters the user can pick from, `A` to `Z`.
pub fn column_letters() -> Vec<String> {
    (b'A'..=b'Z').map(|c| (c as char).to_string()).collect()
}

/// The first five letters, selected when the page opens.
pub fn default_columns() -> Vec<String> {
    column_letters().into_iter().take(5).collect()
}

/// Pearson correlation between every pair of columns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    labels: Vec<String>,
    values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.labels.len() + j]
    }

    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values
            .chunks(self.labels.len().max(1))
            .map(<[f64]>::to_vec)
            .collect()
    }
}

/// A `rows x columns` table of uniform samples in `[0, 1)`, stored column by column.
pub fn random_frame<R: Rng>(columns: usize, rows: usize, rng: &mut R) -> Vec<Vec<f64>> {
    (0..columns)
        .map(|_| (0..rows).map(|_| rng.gen_range(0.0..1.0)).collect())
        .collect()
}

/// Pairwise Pearson coefficients of the given columns.
///
/// A constant column correlates as NaN with everything, itself included.
///
/// # Errors
/// `MalformedData` when labels and columns disagree or columns differ in length.
pub fn correlation_matrix(labels: &[String], columns: &[Vec<f64>]) -> Result<CorrelationMatrix> {
    if labels.len() != columns.len() {
        return Err(AppError::malformed(format!(
            "{} labels for {} columns",
            labels.len(),
            columns.len()
        )));
    }
    let len = columns.first().map_or(0, Vec::len);
    if columns.iter().any(|column| column.len() != len) {
        return Err(AppError::malformed("columns have different lengths"));
    }

    let n = columns.len();
    let mut values = vec![0.0; n * n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&columns[i], &columns[j]);
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    debug!("computed {}x{} correlation matrix over {} rows", n, n, len);
    Ok(CorrelationMatrix {
        labels: labels.to_vec(),
        values,
    })
}

/// Pairwise Pearson coefficients of columns with missing values.
///
/// Each pair is correlated over the rows where both columns have a value, so a
/// null in one column does not drop the row for every other pair.
pub fn correlation_matrix_pairwise(
    labels: &[String],
    columns: &[Vec<Option<f64>>],
) -> Result<CorrelationMatrix> {
    if labels.len() != columns.len() {
        return Err(AppError::malformed(format!(
            "{} labels for {} columns",
            labels.len(),
            columns.len()
        )));
    }
    let len = columns.first().map_or(0, Vec::len);
    if columns.iter().any(|column| column.len() != len) {
        return Err(AppError::malformed("columns have different lengths"));
    }

    let n = columns.len();
    let mut values = vec![0.0; n * n];
    for i in 0..n {
        for j in i..n {
            let (a, b): (Vec<f64>, Vec<f64>) = columns[i]
                .iter()
                .zip(&columns[j])
                .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
                .unzip();
            let r = pearson(&a, &b);
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    debug!("computed {}x{} pairwise correlation matrix over {} rows", n, n, len);
    Ok(CorrelationMatrix {
        labels: labels.to_vec(),
        values,
    })
}

fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len() as f64;
    if a.len() < 2 {
        return f64::NAN;
    }
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let dx = x - mean_a;
        let dy = y - mean_b;
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    let denominator = (var_a * var_b).sqrt();
    if denominator == 0.0 {
        return f64::NAN;
    }
    (cov / denominator).clamp(-1.0, 1.0)
}
