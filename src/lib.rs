/*!
# Data Pages

A small data exploration toolkit: load a CSV file or generate data, run a
simple transformation on it and draw the result.

## Overview

The crate is organised as a set of "pages", each pairing a computation with a
chart and, for some pages, a panel of labelled numbers:

- **CSV scatter** - two numeric columns of a CSV plotted against each other,
  every point labelled with the first column of its row
- **Polynomial interpolation** - samples of `sin(x)` on `[0, 2π]`, a
  least-squares polynomial of a chosen degree through them and the error of
  the fit at a chosen x
- **Correlation heatmap** - Pearson correlation of randomly filled columns
- **Category co-occurrence** - how often two categories share a row across
  two categorical columns, as counts or percentages
- **Correlogram** - Pearson correlation of every numeric column of a CSV
- **Diverging bars** - standard scores of one CSV column, sorted, below-mean
  bars in red

## Architecture

### Core
- `interpolation` - sampling, SVD-based least-squares fit, Horner evaluation
- `cooccurrence` - symmetric pairwise category counts
- `correlation` - random table and Pearson matrix
- `deviation` - standard scores for the diverging bar chart

### Data
- `dataset` - CSV ingestion, null handling, column listing (`ColumnProvider`)
- `config` - page explanations stored as JSON next to the crate

### Output
- `controller` - one entry point per page, returning an image and data panel
- `graph` - PNG rendering with plotters (feature `render`)

## Errors

Every failure is an [`AppError`]; [`AppError::user_message`] gives the text
shown to the user. Nothing is retried.

## Usage

```
use datapages::interpolation::{compute_error, fit_polynomial, generate_samples};

let samples = generate_samples(10);
let fit = fit_polynomial(&samples, 7);
let result = compute_error(&fit, 1.3);
assert!(result.absolute_error < 0.1);
```
*/

pub mod config;
pub mod controller;
pub mod cooccurrence;
pub mod correlation;
pub mod dataset;
pub mod deviation;
pub mod error;
#[cfg(feature = "render")]
pub mod graph;
pub mod interpolation;

/// Re-export the types most callers need
pub use controller::{DataGroup, DataItem, ViewResult};
pub use cooccurrence::{CooccurrenceMatrix, MatrixMode, build_matrix};
pub use dataset::{ColumnProvider, Dataset, LabeledPoint};
pub use error::{AppError, Result};
pub use interpolation::{
    EvaluationResult, InterpolationParams, PolynomialFit, SampleSet, compute_error, evaluate,
    fit_polynomial, generate_samples,
};
