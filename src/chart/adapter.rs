//! Bridge between a [`PriceSeries`] and the chart drawn on screen.
//!
//! The adapter owns the single chart instance through [`ChartHandle`]. A
//! refresh either builds the chart or swaps its arrays in place; every draw
//! re-runs the bar layout from the current arrays.

use chrono::{DateTime, Local, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use super::layout::{BAR_WIDTH, BarVisual, PlotGeometry, ValueScale, layout_bars};
use crate::models::PriceSeries;

/// Label and value arrays, positionally aligned with the series.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartData {
    pub labels: Vec<DateTime<Utc>>,
    pub values: Vec<Decimal>,
}

impl ChartData {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values as plotting coordinates.
    pub fn plot_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|v| v.to_f64().unwrap_or(f64::NAN))
            .collect()
    }
}

/// Splits a series into its timestamp labels and decimal prices.
pub fn to_series_arrays(series: &PriceSeries) -> ChartData {
    let (labels, values) = series
        .samples()
        .iter()
        .map(|sample| (sample.timestamp(), sample.price()))
        .unzip();
    ChartData { labels, values }
}

/// Width the chart needs to show every bar in its own slot.
pub fn display_width(sample_count: usize) -> f64 {
    sample_count as f64 * BAR_WIDTH
}

/// One draw pass: the geometry used and the bars it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartFrame {
    pub geometry: PlotGeometry,
    pub bars: Vec<BarVisual>,
}

/// The chart instance.
#[derive(Debug, Clone)]
pub struct Chart {
    data: ChartData,
    revision: u64,
}

impl Chart {
    fn new(data: ChartData) -> Self {
        Self { data, revision: 0 }
    }

    pub fn data(&self) -> &ChartData {
        &self.data
    }

    /// Number of times the arrays have been replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Full width of the chart, see [`display_width`].
    pub fn width(&self) -> f64 {
        display_width(self.data.len())
    }

    /// Plot geometry for a chart spanning `top..bottom` vertically.
    pub fn geometry(&self, top: f64, bottom: f64) -> PlotGeometry {
        let scale = ValueScale::fit(&self.data.plot_values(), top, bottom);
        PlotGeometry::new(0.0, BAR_WIDTH, scale)
    }

    /// Lays the bars out afresh for this draw.
    pub fn draw(&self, top: f64, bottom: f64) -> ChartFrame {
        let geometry = self.geometry(top, bottom);
        let bars = layout_bars(&self.data.plot_values(), &geometry);
        ChartFrame { geometry, bars }
    }

    fn replace(&mut self, data: ChartData) {
        self.data = data;
        self.revision += 1;
    }
}

/// What [`ChartHandle::apply`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartUpdate {
    Created,
    Updated,
}

/// Owner of the one chart instance.
#[derive(Debug, Default)]
pub struct ChartHandle {
    chart: Option<Chart>,
}

impl ChartHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a freshly fetched series into the chart, creating it on the
    /// first call and replacing its arrays afterwards.
    pub fn apply(&mut self, series: &PriceSeries) -> ChartUpdate {
        let data = to_series_arrays(series);
        match self.chart.as_mut() {
            Some(chart) => {
                chart.replace(data);
                debug!(points = chart.data.len(), revision = chart.revision, "Chart updated");
                ChartUpdate::Updated
            }
            None => {
                debug!(points = data.len(), "Chart created");
                self.chart = Some(Chart::new(data));
                ChartUpdate::Created
            }
        }
    }

    pub fn chart(&self) -> Option<&Chart> {
        self.chart.as_ref()
    }
}

/// Y-axis tick label.
pub fn format_price_tick(value: f64) -> String {
    format!("{value:.8}")
}

/// X-axis and tooltip timestamp, in local time.
pub fn format_time_label(timestamp: &DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

/// Evenly spaced y-axis ticks as `(y, label)` pairs, top to bottom.
pub fn y_ticks(scale: &ValueScale, top: f64, bottom: f64, count: usize) -> Vec<(f64, String)> {
    if count < 2 {
        return Vec::new();
    }
    let step = (bottom - top) / (count - 1) as f64;
    (0..count)
        .map(|i| {
            let y = top + step * i as f64;
            (y, format_price_tick(scale.value_at(y)))
        })
        .collect()
}
