//! Reference sample lookup for the rolling 24h change.

use chrono::{DateTime, TimeDelta, Utc};

use crate::models::{PriceSample, PriceSeries};

/// Width of the change window.
pub const REFERENCE_WINDOW: TimeDelta = TimeDelta::hours(24);

/// Returns the sample used as the "price `window` ago" baseline.
///
/// Scans the series in order and picks the first sample younger than
/// `window` relative to `now`, i.e. the earliest one still inside the
/// window. When every sample is at least `window` old, the first sample of
/// the series is returned instead.
pub fn find_reference_sample<'a>(
    series: &'a PriceSeries,
    now: DateTime<Utc>,
    window: TimeDelta,
) -> &'a PriceSample {
    series
        .samples()
        .iter()
        .find(|sample| now - sample.timestamp() < window)
        .unwrap_or_else(|| series.first())
}
