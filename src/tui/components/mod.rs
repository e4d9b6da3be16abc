//! Widgets composed by [`render`](super::render).

pub mod footer;
pub mod metrics_bar;
pub mod price_chart;
pub mod status_bar;
