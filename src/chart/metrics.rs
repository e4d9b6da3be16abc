//! Derived metrics: current price, 24h change, market cap, holdings value.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use super::window::{REFERENCE_WINDOW, find_reference_sample};
use crate::models::PriceSeries;
use crate::{Result, TokenChartError};

/// A consistent set of metrics derived from one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Price of the latest sample.
    pub current_price: Decimal,
    /// `current_price * total_supply`.
    pub market_cap: Decimal,
    /// Percent change versus the 24h reference; `None` when the reference
    /// price is zero.
    pub change_percent: Option<Decimal>,
    /// `current_price * held_tokens`.
    pub holdings_value: Decimal,
}

/// Computes all metrics from `series` as seen at `now`.
///
/// # Errors
///
/// Returns [`TokenChartError::Overflow`] if the market cap or holdings
/// value does not fit in a [`Decimal`].
pub fn compute_metrics(
    series: &PriceSeries,
    total_supply: Decimal,
    held_tokens: Decimal,
    now: DateTime<Utc>,
) -> Result<MetricsSnapshot> {
    let current_price = series.last().price();
    let reference_price = find_reference_sample(series, now, REFERENCE_WINDOW).price();

    let change_percent = match percent_change(current_price, reference_price) {
        Ok(change) => Some(change),
        Err(e) => {
            debug!(error = %e, "24h change undefined");
            None
        }
    };

    Ok(MetricsSnapshot {
        current_price,
        market_cap: current_price
            .checked_mul(total_supply)
            .ok_or(TokenChartError::Overflow("market cap"))?,
        change_percent,
        holdings_value: holdings_value(current_price, held_tokens)?,
    })
}

/// [`compute_metrics`] against the current wall-clock time.
///
/// # Errors
///
/// See [`compute_metrics`].
pub fn compute_metrics_now(
    series: &PriceSeries,
    total_supply: Decimal,
    held_tokens: Decimal,
) -> Result<MetricsSnapshot> {
    compute_metrics(series, total_supply, held_tokens, Utc::now())
}

/// Relative change from `reference` to `current`, in percent.
///
/// # Errors
///
/// Returns [`TokenChartError::ZeroReferencePrice`] when `reference` is zero,
/// or [`TokenChartError::Overflow`] if the ratio does not fit.
pub fn percent_change(current: Decimal, reference: Decimal) -> Result<Decimal> {
    if reference.is_zero() {
        return Err(TokenChartError::ZeroReferencePrice);
    }
    (current - reference)
        .checked_div(reference)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(TokenChartError::Overflow("percent change"))
}

/// Value of `held_tokens` at `price`.
///
/// # Errors
///
/// Returns [`TokenChartError::Overflow`] if the product does not fit.
pub fn holdings_value(price: Decimal, held_tokens: Decimal) -> Result<Decimal> {
    price
        .checked_mul(held_tokens)
        .ok_or(TokenChartError::Overflow("holdings value"))
}
