//! Price chart engine.
//!
//! Turns a [`PriceSeries`](crate::models::PriceSeries) into the metrics shown
//! above the chart and the bar geometry drawn inside it:
//!
//! - [`window`] finds the ~24h reference sample
//! - [`metrics`] derives price, change, market cap and holdings value
//! - [`layout`] computes the stacked bar geometry
//! - [`tooltip`] places and fills the hover tooltip
//! - [`adapter`] owns the chart instance and its label/value arrays

pub mod adapter;
pub mod layout;
pub mod metrics;
pub mod tooltip;
pub mod window;

pub use adapter::{Chart, ChartData, ChartHandle, ChartUpdate, to_series_arrays};
pub use layout::{BarColor, BarVisual, PlotGeometry, ValueScale, layout_bars};
pub use metrics::{MetricsSnapshot, compute_metrics, compute_metrics_now};
pub use tooltip::{TooltipAnchor, TooltipText, position_tooltip, tooltip_text};
pub use window::{REFERENCE_WINDOW, find_reference_sample};
