use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{AppError, Result};

/// Shown in place of column names when no file has been uploaded yet.
pub const NO_FILE_PLACEHOLDER: &str = "First upload a CSV file";

/// Cell contents that are read as a missing value.
const NULL_MARKERS: [&str; 8] = ["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A"];

/// Anything that can list the columns of a table for the input controls.
///
/// The application layer calls this before rendering the axis and category
/// selectors, so the computation never has to know about the UI.
pub trait ColumnProvider {
    fn list_columns(&self) -> Vec<String>;
}

/// A parsed CSV table: a header row and string cells, `None` for nulls.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

/// One point of the scatter view, labelled by the first column of its row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabeledPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
}

impl ColumnProvider for Dataset {
    fn list_columns(&self) -> Vec<String> {
        self.headers.clone()
    }
}

impl Dataset {
    /// Load a dataset from a CSV file
    ///
    /// # Errors
    /// * `Io` if the file cannot be opened
    /// * `MissingInput` if the file has no header row
    /// * `Csv` / `MalformedData` for rows that cannot be parsed
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("loading dataset from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Parse CSV data from any reader, the first record being the header.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(AppError::missing_input("The CSV file is empty"));
        }

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.map_err(|e| {
                if matches!(e.kind(), csv::ErrorKind::UnequalLengths { .. }) {
                    AppError::malformed(format!(
                        "row {} does not have {} columns",
                        index + 1,
                        headers.len()
                    ))
                } else {
                    AppError::Csv(e)
                }
            })?;
            rows.push(record.iter().map(parse_cell).collect());
        }

        debug!("parsed {} rows x {} columns", rows.len(), headers.len());
        Ok(Self { headers, rows })
    }

    /// Build a dataset from already split cells, mostly for tests and generated data.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Result<Self> {
        if let Some((index, _)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
        {
            return Err(AppError::malformed(format!(
                "row {} does not have {} columns",
                index + 1,
                headers.len()
            )));
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| AppError::malformed(format!("column '{}' not found", name)))
    }

    /// Values of a column parsed as numbers, `None` where the cell is null.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let index = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| match &cells[index] {
                None => Ok(None),
                Some(text) => text.parse::<f64>().map(Some).map_err(|_| {
                    AppError::malformed(format!(
                        "column '{}' is not numeric: '{}' in row {}",
                        name,
                        text,
                        row + 1
                    ))
                }),
            })
            .collect()
    }

    /// Names of the columns whose non-null cells are all numbers, in header order.
    ///
    /// A column with nothing but nulls is left out.
    pub fn numeric_column_names(&self) -> Vec<String> {
        self.headers
            .iter()
            .enumerate()
            .filter(|&(index, _)| {
                let mut cells = self
                    .rows
                    .iter()
                    .filter_map(|cells| cells[index].as_deref())
                    .peekable();
                cells.peek().is_some() && cells.all(|text| text.parse::<f64>().is_ok())
            })
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Non-null values of a numeric column paired with the first column of their row.
    pub fn labeled_values(&self, name: &str) -> Result<Vec<(String, f64)>> {
        let values = self.numeric_column(name)?;
        Ok(self
            .rows
            .iter()
            .zip(values)
            .filter_map(|(cells, value)| {
                value.map(|v| (cells.first().cloned().flatten().unwrap_or_default(), v))
            })
            .collect())
    }

    /// Points for the scatter view; rows with a missing coordinate are skipped.
    pub fn scatter_points(&self, x_column: &str, y_column: &str) -> Result<Vec<LabeledPoint>> {
        let xs = self.numeric_column(x_column)?;
        let ys = self.numeric_column(y_column)?;

        let points = self
            .rows
            .iter()
            .zip(xs.into_iter().zip(ys))
            .filter_map(|(cells, coords)| match coords {
                (Some(x), Some(y)) => Some(LabeledPoint {
                    label: cells.first().cloned().flatten().unwrap_or_default(),
                    x,
                    y,
                }),
                _ => None,
            })
            .collect();
        Ok(points)
    }

    /// Category pairs from two columns, skipping rows where either is null.
    ///
    /// # Errors
    /// `MalformedData` when a column is unknown or holds a numeric value.
    pub fn category_pairs(&self, column_a: &str, column_b: &str) -> Result<Vec<(String, String)>> {
        let a = self.column_index(column_a)?;
        let b = self.column_index(column_b)?;

        let mut pairs = Vec::with_capacity(self.rows.len());
        for (row, cells) in self.rows.iter().enumerate() {
            if let (Some(first), Some(second)) = (&cells[a], &cells[b]) {
                ensure_categorical(first, column_a, row)?;
                ensure_categorical(second, column_b, row)?;
                pairs.push((first.clone(), second.clone()));
            }
        }
        Ok(pairs)
    }

    /// Distinct non-null values of the given columns in order of first appearance.
    pub fn category_vocabulary(&self, columns: &[&str]) -> Result<Vec<String>> {
        let indices = columns
            .iter()
            .map(|name| self.column_index(name))
            .collect::<Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let mut vocabulary = Vec::new();
        for &index in &indices {
            for value in self.rows.iter().filter_map(|cells| cells[index].as_ref()) {
                if seen.insert(value.as_str()) {
                    vocabulary.push(value.clone());
                }
            }
        }
        Ok(vocabulary)
    }
}

/// Options for the axis selectors: the columns of the upload, or a hint to upload one.
pub fn column_options(dataset: Option<&dyn ColumnProvider>) -> Vec<String> {
    match dataset {
        Some(provider) => provider.list_columns(),
        None => vec![NO_FILE_PLACEHOLDER.to_string()],
    }
}

fn parse_cell(raw: &str) -> Option<String> {
    if raw.is_empty() || NULL_MARKERS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

fn ensure_categorical(value: &str, column: &str, row: usize) -> Result<()> {
    // `inf` and `infinity` parse as floats but are valid category names
    if value.parse::<f64>().is_ok_and(f64::is_finite) {
        return Err(AppError::malformed(format!(
            "column '{}' must hold categories, found number '{}' in row {}",
            column,
            value,
            row + 1
        )));
    }
    Ok(())
}
