//! Line chart rendering for rate series
//!
//! Draws value against date as a single labelled line into an SVG file.

use crate::RateSnapshot;
use chrono::{Days, NaiveDate};
use plotters::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use std::path::Path;
use tracing::{debug, info};

use super::{ensure_parent_dir, OutputError, OutputResult};

const CHART_SIZE: (u32, u32) = (1024, 576);

/// Y axis bounds with a little headroom; flat series get a non-empty span
fn value_bounds(values: &[f64]) -> (f64, f64) {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let pad = if span > 0.0 { span * 0.05 } else { (max.abs() * 0.01).max(0.01) };
    (min - pad, max + pad)
}

fn chart_error<E: std::fmt::Display>(e: E) -> OutputError {
    OutputError::ChartError(e.to_string())
}

/// Render `records` as a line chart at `destination`
///
/// No-op for an empty series. Parent directories are created as needed.
/// Returns whether a file was written.
pub fn render_chart<P: AsRef<Path>>(records: &[RateSnapshot], destination: P) -> OutputResult<bool> {
    let destination = destination.as_ref();
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => {
            debug!("No rates to plot, skipping {}", destination.display());
            return Ok(false);
        }
    };

    ensure_parent_dir(destination)?;

    let origin = first.date;
    let points: Vec<(i64, f64)> = records
        .iter()
        .filter_map(|s| Some(((s.date - origin).num_days(), s.value.to_f64()?)))
        .collect();
    let values: Vec<f64> = points.iter().map(|&(_, v)| v).collect();
    let (y_min, y_max) = value_bounds(&values);
    let x_max = (last.date - origin).num_days().max(1);

    let label_date = |offset: &i64| -> String {
        u64::try_from(*offset)
            .ok()
            .and_then(|days| origin.checked_add_days(Days::new(days)))
            .map(|date: NaiveDate| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    };

    let currency = first.currency.to_string();
    {
        let root = SVGBackend::new(destination, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{currency}/RUB exchange rate"), ("sans-serif", 24))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(72)
            .build_cartesian_2d(0i64..x_max, y_min..y_max)
            .map_err(chart_error)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("RUB")
            .x_labels(records.len().min(10))
            .x_label_formatter(&label_date)
            .y_label_formatter(&|v| format!("{v:.2}"))
            .draw()
            .map_err(chart_error)?;

        chart
            .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
            .map_err(chart_error)?
            .label(currency.clone())
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .draw_series(points.iter().map(|&point| Circle::new(point, 3, BLUE.filled())))
            .map_err(chart_error)?;

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(chart_error)?;

        root.present().map_err(chart_error)?;
    }

    info!("Chart written to {}", destination.display());
    Ok(true)
}
