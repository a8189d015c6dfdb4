//! One entry point per page of the app.
//!
//! Each view checks its inputs, runs the computation and, with the `render`
//! feature, draws the result. The `*_data` functions stop before drawing so
//! the numbers can be used without a renderer.

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::cooccurrence::{CooccurrenceMatrix, MatrixMode, build_matrix};
use crate::correlation::{
    CorrelationMatrix, DEFAULT_ROWS, correlation_matrix, correlation_matrix_pairwise, random_frame,
};
use crate::dataset::{Dataset, LabeledPoint};
use crate::deviation::{DivergingBar, diverging_bars};
use crate::error::{AppError, Result};
use crate::interpolation::{
    DISPLAY_DECIMALS, EvaluationResult, InterpolationParams, InterpolationPlot, compute_error,
    fit_polynomial, generate_samples,
};

/// Message shown when the scatter page is missing its file or an axis.
pub const MISSING_CSV_MESSAGE: &str = "Upload a CSV file and define its axis";

/// A labelled number for the data panel next to a chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataItem {
    pub label: String,
    pub value: f64,
    pub number_of_decimals: u32,
}

impl DataItem {
    pub fn new(label: &str, value: f64, number_of_decimals: u32) -> Self {
        Self {
            label: label.to_string(),
            value,
            number_of_decimals,
        }
    }

    /// The value as the panel prints it.
    pub fn display_value(&self) -> String {
        format!("{:.*}", self.number_of_decimals as usize, self.value)
    }
}

/// Ordered group of data items.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DataGroup {
    pub items: Vec<DataItem>,
}

impl DataGroup {
    pub fn get(&self, label: &str) -> Option<&DataItem> {
        self.items.iter().find(|item| item.label == label)
    }
}

/// What a view hands back: an image and possibly a data panel.
#[derive(Clone, Debug)]
pub struct ViewResult {
    pub png: Vec<u8>,
    pub data: Option<DataGroup>,
}

/// Computed content of the interpolation page.
#[derive(Clone, Debug, Serialize)]
pub struct InterpolationOutcome {
    pub plot: InterpolationPlot,
    pub evaluation: EvaluationResult,
    pub data: DataGroup,
}

/// Scatter points for the chosen axes of an uploaded CSV.
///
/// # Errors
/// * `MissingInput` when no dataset or no axis was given
/// * `MalformedData` when an axis is unknown or not numeric
pub fn csv_visualization_data(
    dataset: Option<&Dataset>,
    x_column: Option<&str>,
    y_column: Option<&str>,
) -> Result<Vec<LabeledPoint>> {
    let (dataset, x_column, y_column) = match (dataset, x_column, y_column) {
        (Some(dataset), Some(x), Some(y)) if !x.is_empty() && !y.is_empty() => (dataset, x, y),
        _ => return Err(AppError::missing_input(MISSING_CSV_MESSAGE)),
    };

    info!("scatter of '{}' against '{}'", y_column, x_column);
    dataset.scatter_points(x_column, y_column)
}

/// Samples, fit, query point and data panel of the interpolation page.
pub fn interpolation_data(params: &InterpolationParams) -> Result<InterpolationOutcome> {
    params.validate()?;
    info!(
        "interpolating {} samples with degree {} at x = {}",
        params.samples, params.degree, params.x
    );

    let samples = generate_samples(params.samples);
    let fit = fit_polynomial(&samples, params.degree);
    let evaluation = compute_error(&fit, params.x);
    let plot = InterpolationPlot::build(&samples, &fit, params.x, params.show_fit);

    let data = DataGroup {
        items: vec![
            DataItem::new("Y-interpolated", evaluation.interpolated_y, DISPLAY_DECIMALS),
            DataItem::new("Y-calculated", evaluation.true_y, DISPLAY_DECIMALS),
            DataItem::new("Error", evaluation.absolute_error, DISPLAY_DECIMALS),
        ],
    };

    Ok(InterpolationOutcome {
        plot,
        evaluation,
        data,
    })
}

/// Correlation matrix of a random table over the selected column letters.
///
/// A seed makes the table reproducible; without one it comes from OS entropy.
pub fn correlation_data(columns: &[String], seed: Option<u64>) -> Result<CorrelationMatrix> {
    if columns.is_empty() {
        return Err(AppError::missing_input("Select the columns to compare"));
    }

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame = random_frame(columns.len(), DEFAULT_ROWS, &mut rng);
    correlation_matrix(columns, &frame)
}

/// Correlogram of an uploaded CSV: Pearson correlation of every numeric column.
///
/// Text columns are skipped. Each pair of columns is correlated over the rows
/// where both have a value.
///
/// # Errors
/// * `MissingInput` when no dataset was given
/// * `MalformedData` when the dataset has no numeric column
pub fn correlogram_data(dataset: Option<&Dataset>) -> Result<CorrelationMatrix> {
    let dataset = dataset.ok_or_else(|| AppError::missing_input("Upload a CSV file first"))?;

    let labels = dataset.numeric_column_names();
    if labels.is_empty() {
        return Err(AppError::malformed("the CSV file has no numeric columns"));
    }
    let columns = labels
        .iter()
        .map(|name| dataset.numeric_column(name))
        .collect::<Result<Vec<_>>>()?;

    info!("correlogram of {} numeric columns", labels.len());
    correlation_matrix_pairwise(&labels, &columns)
}

/// Standard scores of one numeric column, lowest first, labelled by the first column.
///
/// # Errors
/// * `MissingInput` when no dataset or column was given
/// * `MalformedData` for an unknown, text or constant column
pub fn diverging_bars_data(
    dataset: Option<&Dataset>,
    column: Option<&str>,
) -> Result<Vec<DivergingBar>> {
    let (dataset, column) = match (dataset, column) {
        (Some(dataset), Some(column)) if !column.is_empty() => (dataset, column),
        _ => return Err(AppError::missing_input("Upload a CSV file and pick a column")),
    };

    info!("diverging bars of '{}'", column);
    diverging_bars(&dataset.labeled_values(column)?)
}

/// Co-occurrence matrix of two categorical columns for the selected categories.
///
/// # Errors
/// * `MissingInput` when no dataset was given
/// * `InsufficientSelection` when fewer than two categories are selected
/// * `MalformedData` for unknown or numeric columns
pub fn cooccurrence_data(
    dataset: Option<&Dataset>,
    column_a: &str,
    column_b: &str,
    selected: &[String],
    mode: MatrixMode,
) -> Result<CooccurrenceMatrix> {
    let dataset =
        dataset.ok_or_else(|| AppError::missing_input("Load a dataset with two category columns"))?;

    let rows = dataset.category_pairs(column_a, column_b)?;
    info!(
        "co-occurrence of {} categories over {} rows ({:?})",
        selected.len(),
        rows.len(),
        mode
    );
    build_matrix(&rows, selected, mode)
}

#[cfg(feature = "render")]
mod views {
    use super::*;
    use crate::graph::{
        GraphOptions, HeatmapData, create_diverging_bars, create_heatmap,
        create_interpolation_graph, create_scatter_graph,
    };

    /// Scatter plot of two columns of an uploaded CSV.
    pub fn csv_visualization(
        dataset: Option<&Dataset>,
        x_column: Option<&str>,
        y_column: Option<&str>,
    ) -> Result<ViewResult> {
        let points = csv_visualization_data(dataset, x_column, y_column)?;
        let options = GraphOptions {
            title: "CSV data".to_string(),
            x_label: x_column.unwrap_or_default().to_string(),
            y_label: y_column.unwrap_or_default().to_string(),
            ..GraphOptions::default()
        };
        Ok(ViewResult {
            png: create_scatter_graph(&points, &options)?,
            data: None,
        })
    }

    /// Sine samples, fitted polynomial and the error at the chosen x.
    pub fn interpolation_view(params: &InterpolationParams) -> Result<ViewResult> {
        let outcome = interpolation_data(params)?;
        let options = GraphOptions {
            title: format!("Degree {} fit of {} samples", params.degree, params.samples),
            x_label: "x".to_string(),
            y_label: "sin(x)".to_string(),
            ..GraphOptions::default()
        };
        Ok(ViewResult {
            png: create_interpolation_graph(&outcome.plot, &options)?,
            data: Some(outcome.data),
        })
    }

    /// Heatmap of the correlation between randomly filled columns.
    pub fn correlation_map(columns: &[String], seed: Option<u64>) -> Result<ViewResult> {
        let matrix = correlation_data(columns, seed)?;
        let heatmap = HeatmapData {
            labels: matrix.labels().to_vec(),
            rows: matrix.rows(),
            decimals: 2,
        };
        Ok(ViewResult {
            png: create_heatmap(&heatmap, &GraphOptions::titled("Correlation Matrix"))?,
            data: None,
        })
    }

    /// Annotated heatmap of the correlation between the numeric columns of a CSV.
    pub fn correlogram(dataset: Option<&Dataset>) -> Result<ViewResult> {
        let matrix = correlogram_data(dataset)?;
        let heatmap = HeatmapData {
            labels: matrix.labels().to_vec(),
            rows: matrix.rows(),
            decimals: 2,
        };
        Ok(ViewResult {
            png: create_heatmap(&heatmap, &GraphOptions::titled("Correlogram"))?,
            data: None,
        })
    }

    /// Diverging bars of the standard scores of one column.
    pub fn diverging_bars_view(
        dataset: Option<&Dataset>,
        column: Option<&str>,
    ) -> Result<ViewResult> {
        let bars = diverging_bars_data(dataset, column)?;
        let column = column.unwrap_or_default();
        let options = GraphOptions {
            title: format!("Diverging bars of {}", column),
            x_label: format!("{} (z-score)", column),
            y_label: String::new(),
            ..GraphOptions::default()
        };
        Ok(ViewResult {
            png: create_diverging_bars(&bars, &options)?,
            data: None,
        })
    }

    /// Heatmap of how often the selected categories appear together.
    pub fn cooccurrence_map(
        dataset: Option<&Dataset>,
        column_a: &str,
        column_b: &str,
        selected: &[String],
        mode: MatrixMode,
    ) -> Result<ViewResult> {
        let matrix = cooccurrence_data(dataset, column_a, column_b, selected, mode)?;
        let heatmap = HeatmapData {
            labels: matrix.labels().to_vec(),
            rows: matrix.rows(),
            decimals: match mode {
                MatrixMode::Count => 0,
                MatrixMode::Percentage => 2,
            },
        };
        let title = format!("{} / {} co-occurrence", column_a, column_b);
        Ok(ViewResult {
            png: create_heatmap(&heatmap, &GraphOptions::titled(&title))?,
            data: None,
        })
    }
}

#[cfg(feature = "render")]
pub use views::*;
