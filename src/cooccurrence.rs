//! Pairwise co-occurrence counts between two categorical columns.

use log::debug;
use serde::Serialize;

use crate::error::{AppError, Result};
use crate::interpolation::round_to;

/// Smallest selection a matrix can be built from.
pub const MIN_CATEGORIES: usize = 2;

/// What each cell of the matrix holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum MatrixMode {
    /// Number of rows holding the pair
    #[default]
    Count,
    /// Share of all rows holding the pair, in percent with 2 decimals
    Percentage,
}

/// Symmetric category-by-category matrix with a zero diagonal.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CooccurrenceMatrix {
    labels: Vec<String>,
    values: Vec<f64>,
    mode: MatrixMode,
}

impl CooccurrenceMatrix {
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn dimension(&self) -> usize {
        self.labels.len()
    }

    pub fn mode(&self) -> MatrixMode {
        self.mode
    }

    /// Value at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.labels.len() + j]
    }

    /// Value for a pair of category names, if both were selected.
    pub fn get_by_label(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.labels.iter().position(|label| label == a)?;
        let j = self.labels.iter().position(|label| label == b)?;
        Some(self.get(i, j))
    }

    /// Matrix as nested rows, ready for a heatmap.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values
            .chunks(self.labels.len())
            .map(<[f64]>::to_vec)
            .collect()
    }
}

/// Counts, for every pair of selected categories, the rows holding both in
/// either column order.
///
/// Duplicate entries in `selected` are collapsed, keeping the first.
///
/// # Errors
/// `InsufficientSelection` when fewer than two distinct categories are selected.
pub fn build_matrix(
    rows: &[(String, String)],
    selected: &[String],
    mode: MatrixMode,
) -> Result<CooccurrenceMatrix> {
    let mut labels: Vec<String> = Vec::with_capacity(selected.len());
    for category in selected {
        if !labels.contains(category) {
            labels.push(category.clone());
        }
    }
    if labels.len() < MIN_CATEGORIES {
        return Err(AppError::insufficient_selection(MIN_CATEGORIES, labels.len()));
    }

    let n = labels.len();
    let total = rows.len();
    let mut values = vec![0.0; n * n];

    for i in 0..n {
        for j in (i + 1)..n {
            let (first, second) = (&labels[i], &labels[j]);
            let count = rows
                .iter()
                .filter(|(a, b)| (a == first && b == second) || (a == second && b == first))
                .count();

            let value = match mode {
                MatrixMode::Count => count as f64,
                MatrixMode::Percentage if total > 0 => {
                    round_to(count as f64 / total as f64 * 100.0, 2)
                }
                MatrixMode::Percentage => 0.0,
            };
            values[i * n + j] = value;
            values[j * n + i] = value;
        }
    }

    debug!("built {}x{} co-occurrence matrix from {} rows", n, n, total);
    Ok(CooccurrenceMatrix {
        labels,
        values,
        mode,
    })
}
