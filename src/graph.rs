#![cfg(feature = "render")]
use crate::dataset::LabeledPoint;
use crate::deviation::DivergingBar;
use crate::error::{AppError, Result};
use crate::interpolation::InterpolationPlot;
use image::{ImageBuffer, ImageOutputFormat, Rgb};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use std::error::Error;
use std::f64::consts::PI;
use std::io::Cursor;

/// Configuration options for graph generation
///
/// This structure contains the customizable properties shared by every chart
/// the views produce.
#[derive(Clone, Debug)]
pub struct GraphOptions {
    /// Title displayed at the top of the graph
    pub title: String,

    /// Label for the X-axis
    pub x_label: String,

    /// Label for the Y-axis
    pub y_label: String,

    /// Width of the graph in pixels
    pub width: u32,

    /// Height of the graph in pixels
    pub height: u32,
}

impl Default for GraphOptions {
    /// Creates a default configuration for graph generation
    ///
    /// # Returns
    /// * `GraphOptions` - Default configuration with 800x600 pixel dimensions
    ///   and generic labels
    fn default() -> Self {
        Self {
            title: "Graph".to_string(),
            x_label: "X Axis".to_string(),
            y_label: "Y Axis".to_string(),
            width: 800,
            height: 600,
        }
    }
}

impl GraphOptions {
    /// Default options with another title.
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}

/// Square matrix with row/column labels, the input of a heatmap.
#[derive(Clone, Debug)]
pub struct HeatmapData {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    /// Decimals printed inside each cell
    pub decimals: usize,
}

/// Creates a scatter plot of labelled points
///
/// Each point is drawn as a circle with the label of its row written next to it.
///
/// # Returns
/// * The PNG image data as bytes or a `Render` error
pub fn create_scatter_graph(points: &[LabeledPoint], options: &GraphOptions) -> Result<Vec<u8>> {
    render_png(options, |root| draw_scatter(root, points, options))
}

/// Creates the interpolation chart
///
/// Draws the sampled sine curve, the fitted polynomial when present, the
/// queried point and a vertical marker at its x value.
pub fn create_interpolation_graph(
    plot: &InterpolationPlot,
    options: &GraphOptions,
) -> Result<Vec<u8>> {
    render_png(options, |root| draw_interpolation(root, plot, options))
}

/// Creates a heatmap of a labelled square matrix
///
/// # Implementation Notes
/// * Cells are coloured on a blue-white-red scale between the smallest and
///   largest finite value
/// * NaN cells are drawn grey
pub fn create_heatmap(data: &HeatmapData, options: &GraphOptions) -> Result<Vec<u8>> {
    if data.rows.len() != data.labels.len() || data.rows.iter().any(|r| r.len() != data.labels.len())
    {
        return Err(AppError::Render("heatmap data must be square".to_string()));
    }
    render_png(options, |root| draw_heatmap(root, data, options))
}

/// Creates a horizontal diverging bar chart of standard scores
///
/// Bars are stacked bottom-up in the order given, growing left from zero for
/// negative scores (red) and right for positive ones (green).
pub fn create_diverging_bars(bars: &[DivergingBar], options: &GraphOptions) -> Result<Vec<u8>> {
    render_png(options, |root| draw_diverging_bars(root, bars, options))
}

type Root<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

fn render_png<F>(options: &GraphOptions, draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&Root<'_>) -> std::result::Result<(), Box<dyn Error>>,
{
    let (width, height) = (options.width, options.height);
    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw(&root).map_err(|e| AppError::Render(e.to_string()))?;
        root.present()
            .map_err(|e| AppError::Render(e.to_string()))?;
    }
    encode_png(pixels, width, height)
}

fn encode_png(pixels: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, pixels)
        .ok_or_else(|| AppError::Render("pixel buffer does not match image size".to_string()))?;

    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageOutputFormat::Png)
        .map_err(|e| AppError::Render(e.to_string()))?;
    Ok(png.into_inner())
}

fn draw_scatter(
    root: &Root<'_>,
    points: &[LabeledPoint],
    options: &GraphOptions,
) -> std::result::Result<(), Box<dyn Error>> {
    root.fill(&WHITE)?;

    let x_range = padded_range(points.iter().map(|p| p.x));
    let y_range = padded_range(points.iter().map(|p| p.y));

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range)?;

    chart
        .configure_mesh()
        .x_desc(&options.x_label)
        .y_desc(&options.y_label)
        .draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|p| Circle::new((p.x, p.y), 4, BLUE.filled())),
    )?;
    chart.draw_series(points.iter().map(|p| {
        Text::new(
            p.label.clone(),
            (p.x, p.y),
            ("sans-serif", 12).into_font(),
        )
    }))?;

    Ok(())
}

fn draw_interpolation(
    root: &Root<'_>,
    plot: &InterpolationPlot,
    options: &GraphOptions,
) -> std::result::Result<(), Box<dyn Error>> {
    root.fill(&WHITE)?;

    let curve = plot.fitted_curve.as_deref().unwrap_or(&[]);
    let y_range = padded_range(
        plot.samples
            .iter()
            .chain(curve)
            .map(|&(_, y)| y)
            .chain(std::iter::once(plot.highlight.1)),
    );
    let x_range = 0.0..2.0 * PI;

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(x_range, y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc(&options.x_label)
        .y_desc(&options.y_label)
        .draw()?;

    chart.draw_series(LineSeries::new(plot.samples.iter().copied(), &BLUE))?;

    if !curve.is_empty() {
        chart.draw_series(LineSeries::new(curve.iter().copied(), &GREEN))?;
    }

    chart.draw_series(LineSeries::new(
        vec![(plot.marker_x, y_range.start), (plot.marker_x, y_range.end)],
        RED.stroke_width(1),
    ))?;
    chart.draw_series(std::iter::once(Circle::new(
        plot.highlight,
        5,
        RGBColor(255, 127, 14).filled(),
    )))?;

    Ok(())
}

fn draw_heatmap(
    root: &Root<'_>,
    data: &HeatmapData,
    options: &GraphOptions,
) -> std::result::Result<(), Box<dyn Error>> {
    root.fill(&WHITE)?;

    let n = data.labels.len();
    let finite = data.rows.iter().flatten().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d((0..n).into_segmented(), (0..n).into_segmented())?;

    let column_label = |value: &SegmentValue<usize>| match value {
        SegmentValue::CenterOf(j) => data.labels.get(*j).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let row_label = |value: &SegmentValue<usize>| match value {
        SegmentValue::CenterOf(slot) if *slot < n => data.labels[row_slot(*slot, n)].clone(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&column_label)
        .y_label_formatter(&row_label)
        .draw()?;

    // Row 0 of the matrix goes at the top
    chart.draw_series(data.rows.iter().enumerate().flat_map(|(i, row)| {
        let slot = row_slot(i, n);
        row.iter().enumerate().map(move |(j, &value)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(j), SegmentValue::Exact(slot)),
                    (SegmentValue::Exact(j + 1), SegmentValue::Exact(slot + 1)),
                ],
                heat_color(value, min, max).filled(),
            )
        })
    }))?;

    let decimals = data.decimals;
    chart.draw_series(data.rows.iter().enumerate().flat_map(|(i, row)| {
        let slot = row_slot(i, n);
        row.iter().enumerate().map(move |(j, &value)| {
            Text::new(
                format!("{:.*}", decimals, value),
                (SegmentValue::CenterOf(j), SegmentValue::CenterOf(slot)),
                ("sans-serif", 12).into_font(),
            )
        })
    }))?;

    Ok(())
}

/// Vertical slot of matrix row `row` out of `n`, counted from the bottom.
///
/// The mapping is its own inverse, so it also turns a slot back into a row.
fn row_slot(row: usize, n: usize) -> usize {
    n - 1 - row
}

fn draw_diverging_bars(
    root: &Root<'_>,
    bars: &[DivergingBar],
    options: &GraphOptions,
) -> std::result::Result<(), Box<dyn Error>> {
    root.fill(&WHITE)?;

    let n = bars.len();
    let reach = bars
        .iter()
        .map(|bar| bar.z_score.abs())
        .filter(|z| z.is_finite())
        .fold(0.0, f64::max)
        .max(1.0)
        * 1.1;

    let mut chart = ChartBuilder::on(root)
        .caption(&options.title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(120)
        .build_cartesian_2d(-reach..reach, (0..n).into_segmented())?;

    let label_of = |value: &SegmentValue<usize>| match value {
        SegmentValue::CenterOf(i) => bars.get(*i).map(|b| b.label.clone()).unwrap_or_default(),
        _ => String::new(),
    };

    chart
        .configure_mesh()
        .y_labels(n)
        .y_label_formatter(&label_of)
        .x_desc(&options.x_label)
        .y_desc(&options.y_label)
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        let color = if bar.is_below_mean() { RED } else { GREEN };
        Rectangle::new(
            [
                (0.0, SegmentValue::Exact(i)),
                (bar.z_score, SegmentValue::Exact(i + 1)),
            ],
            color.mix(0.4).filled(),
        )
    }))?;

    Ok(())
}

/// Blue-white-red colour for `value` on the scale `[min, max]`.
///
/// NaN maps to grey, a flat scale to white.
pub fn heat_color(value: f64, min: f64, max: f64) -> RGBColor {
    if value.is_nan() {
        return RGBColor(160, 160, 160);
    }
    let span = max - min;
    if !span.is_finite() || span <= 0.0 {
        return RGBColor(255, 255, 255);
    }

    let t = ((value - min) / span).clamp(0.0, 1.0);
    let blend = |from: u8, to: u8, amount: f64| -> u8 {
        (from as f64 + (to as f64 - from as f64) * amount).round() as u8
    };
    if t < 0.5 {
        let amount = t * 2.0;
        RGBColor(blend(59, 255, amount), blend(76, 255, amount), blend(192, 255, amount))
    } else {
        let amount = (t - 0.5) * 2.0;
        RGBColor(blend(255, 180, amount), blend(255, 4, amount), blend(255, 38, amount))
    }
}

fn padded_range(values: impl Iterator<Item = f64>) -> std::ops::Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let pad = ((max - min) * 0.05).max(0.5);
    (min - pad)..(max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_color_scale_ends() {
        assert_eq!(heat_color(0.0, 0.0, 1.0), RGBColor(59, 76, 192));
        assert_eq!(heat_color(0.5, 0.0, 1.0), RGBColor(255, 255, 255));
        assert_eq!(heat_color(1.0, 0.0, 1.0), RGBColor(180, 4, 38));
        assert_eq!(heat_color(f64::NAN, 0.0, 1.0), RGBColor(160, 160, 160));
        assert_eq!(heat_color(3.0, 3.0, 3.0), RGBColor(255, 255, 255));
    }

    #[test]
    fn heatmap_first_row_is_drawn_on_top() {
        // plotters counts slots from the bottom of the chart
        assert_eq!(row_slot(0, 3), 2);
        assert_eq!(row_slot(1, 3), 1);
        assert_eq!(row_slot(2, 3), 0);
        for row in 0..4 {
            assert_eq!(row_slot(row_slot(row, 4), 4), row);
        }
    }

    #[test]
    fn padded_range_ignores_non_finite() {
        let range = padded_range([1.0, f64::NAN, 3.0].into_iter());
        assert!(range.start < 1.0 && range.end > 3.0);
        assert_eq!(padded_range(std::iter::empty::<f64>()), 0.0..1.0);
    }

    #[test]
    fn png_encoding_of_blank_canvas() {
        let png = encode_png(vec![255; 4 * 3 * 3], 4, 3).unwrap();
        assert_eq!(&png[1..4], b"PNG");
        assert!(encode_png(vec![0; 5], 4, 3).is_err());
    }
}
