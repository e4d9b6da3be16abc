//! Application state for the TUI.

use std::str::FromStr;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::chart::metrics::holdings_value;
use crate::chart::{ChartHandle, ChartUpdate, MetricsSnapshot, compute_metrics_now};
use crate::models::{PriceRecord, PriceSeries, TokenInfo};
use crate::tui::input::TextInput;
use crate::{Result, TokenChartError};

/// How long an error stays in the status bar.
const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// Central application state container.
pub struct App {
    // -- Token State --
    /// Contract address of the charted token.
    pub contract: String,
    /// Total supply reported by the token endpoint (zero until loaded).
    pub total_supply: Decimal,
    /// Tokens the user says they hold.
    pub held_tokens: Decimal,

    // -- Market Data --
    /// Last series that was accepted.
    pub series: Option<PriceSeries>,
    /// Metrics derived from `series`.
    pub metrics: Option<MetricsSnapshot>,
    /// The single chart instance.
    pub chart: ChartHandle,
    /// Wall-clock time of the last accepted refresh.
    pub last_refresh: Option<DateTime<Local>>,

    // -- UI State --
    /// Current input mode.
    pub mode: Mode,
    /// Holdings amount being typed.
    pub holdings_input: TextInput,
    /// Last mouse position `(column, row)` seen over the terminal.
    pub hover: Option<(u16, u16)>,
    /// How many bars the chart is scrolled back from the latest one.
    pub scroll_back: usize,
    /// Error message to display (clears after timeout).
    pub error_message: Option<ErrorDisplay>,

    // -- Internal --
    /// Flag to signal application should quit.
    pub should_quit: bool,
}

impl App {
    /// Creates a new App instance for `contract`.
    pub fn new(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            total_supply: Decimal::ZERO,
            held_tokens: Decimal::ZERO,

            series: None,
            metrics: None,
            chart: ChartHandle::new(),
            last_refresh: None,

            mode: Mode::Normal,
            holdings_input: TextInput::new(),
            hover: None,
            scroll_back: 0,
            error_message: None,

            should_quit: false,
        }
    }

    /// Replaces the series with freshly fetched records.
    ///
    /// Metrics are computed before anything is stored, so on error the
    /// previous series, metrics and chart stay as they were.
    ///
    /// # Errors
    ///
    /// Returns [`TokenChartError::EmptySeries`] for an empty history, or any
    /// validation/overflow error from building the series and metrics.
    pub fn apply_prices(&mut self, records: &[PriceRecord]) -> Result<ChartUpdate> {
        let series = PriceSeries::from_records(records)?;
        let metrics = compute_metrics_now(&series, self.total_supply, self.held_tokens)?;

        let update = self.chart.apply(&series);
        info!(
            points = series.len(),
            price = %metrics.current_price,
            ?update,
            "Price series refreshed"
        );
        self.series = Some(series);
        self.metrics = Some(metrics);
        self.last_refresh = Some(Local::now());
        Ok(update)
    }

    /// Stores the token metadata and refreshes the market cap.
    pub fn set_token(&mut self, token: TokenInfo) {
        self.total_supply = token.total_supply;
        info!(total_supply = %self.total_supply, "Token metadata loaded");
        self.recompute_metrics();
    }

    /// Recomputes metrics from the current series, keeping the old ones if
    /// that fails.
    fn recompute_metrics(&mut self) {
        let Some(series) = &self.series else {
            return;
        };
        match compute_metrics_now(series, self.total_supply, self.held_tokens) {
            Ok(metrics) => self.metrics = Some(metrics),
            Err(e) => {
                warn!(error = %e, "Keeping previous metrics");
                self.show_error(e.to_string());
            }
        }
    }

    /// Sets the held token count from user input.
    ///
    /// # Errors
    ///
    /// Returns [`TokenChartError::InvalidHoldings`] (or an overflow) and
    /// leaves both the held count and holdings value untouched.
    pub fn set_holdings(&mut self, input: &str) -> Result<()> {
        let tokens = parse_holdings(input)?;
        let value = match &self.metrics {
            Some(metrics) => Some(holdings_value(metrics.current_price, tokens)?),
            None => None,
        };

        self.held_tokens = tokens;
        if let (Some(metrics), Some(value)) = (self.metrics.as_mut(), value) {
            metrics.holdings_value = value;
        }
        Ok(())
    }

    /// Submits the holdings input field. Invalid input is ignored.
    pub fn submit_holdings(&mut self) {
        let input = self.holdings_input.take();
        self.mode = Mode::Normal;
        if let Err(e) = self.set_holdings(&input) {
            warn!(error = %e, "Ignoring holdings input");
        }
    }

    /// Scrolls the chart back toward older bars.
    pub fn scroll_older(&mut self, bars: usize) {
        let count = self.chart.chart().map_or(0, |c| c.data().len());
        self.scroll_back = (self.scroll_back + bars).min(count.saturating_sub(1));
    }

    /// Scrolls the chart toward the latest bar.
    pub fn scroll_newer(&mut self, bars: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(bars);
    }

    /// Sets an error message to display.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(ErrorDisplay {
            message: message.into(),
            timestamp: Instant::now(),
        });
    }

    /// Clears error messages older than five seconds.
    pub fn clear_stale_errors(&mut self) {
        if let Some(ref error) = self.error_message
            && error.timestamp.elapsed() > ERROR_DISPLAY_DURATION
        {
            self.error_message = None;
        }
    }
}

/// Parses a user-entered token amount.
///
/// Accepts plain (`12.5`) or scientific (`1e3`) notation, surrounded by
/// whitespace. Empty, non-numeric and negative amounts are rejected.
///
/// # Errors
///
/// Returns [`TokenChartError::InvalidHoldings`] carrying the raw input.
pub fn parse_holdings(input: &str) -> Result<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TokenChartError::InvalidHoldings(input.to_string()));
    }
    let amount = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| TokenChartError::InvalidHoldings(input.to_string()))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(TokenChartError::InvalidHoldings(input.to_string()));
    }
    Ok(amount)
}

/// Input mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    /// Typing a holdings amount.
    Insert,
}

/// Error message with timestamp for auto-clear.
#[derive(Clone, Debug)]
pub struct ErrorDisplay {
    /// The error message.
    pub message: String,
    /// When the error was shown.
    pub timestamp: Instant,
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use rust_decimal_macros::dec;

    use super::*;

    const ONE: u128 = 1_000_000_000_000_000_000;

    fn records(raw_prices: &[u128]) -> Vec<PriceRecord> {
        let count = raw_prices.len() as i64;
        raw_prices
            .iter()
            .enumerate()
            .map(|(i, raw)| PriceRecord {
                price: *raw,
                created_at: Utc::now() - TimeDelta::minutes(count - i as i64),
            })
            .collect()
    }

    #[test]
    fn prices_then_token_fill_every_metric() {
        let mut app = App::new("0xabc");
        assert_eq!(
            app.apply_prices(&records(&[ONE, 2 * ONE])).unwrap(),
            ChartUpdate::Created
        );
        app.set_token(TokenInfo {
            total_supply: dec!(1000000),
        });

        let metrics = app.metrics.unwrap();
        assert_eq!(metrics.current_price, dec!(2));
        assert_eq!(metrics.change_percent, Some(dec!(100)));
        assert_eq!(metrics.market_cap, dec!(2000000));
        assert_eq!(metrics.holdings_value, Decimal::ZERO);
    }

    #[test]
    fn second_refresh_updates_the_chart() {
        let mut app = App::new("0xabc");
        app.apply_prices(&records(&[ONE])).unwrap();
        assert_eq!(
            app.apply_prices(&records(&[ONE, ONE / 2])).unwrap(),
            ChartUpdate::Updated
        );
        assert_eq!(app.chart.chart().unwrap().data().len(), 2);
    }

    #[test]
    fn empty_refresh_keeps_previous_state() {
        let mut app = App::new("0xabc");
        app.apply_prices(&records(&[ONE, 3 * ONE])).unwrap();
        let before = app.metrics;

        let err = app.apply_prices(&[]).unwrap_err();
        assert!(matches!(err, TokenChartError::EmptySeries));
        assert_eq!(app.metrics, before);
        assert_eq!(app.series.as_ref().unwrap().len(), 2);
    }

    #[test]
    fn holdings_update_value() {
        let mut app = App::new("0xabc");
        app.apply_prices(&records(&[ONE, 2 * ONE])).unwrap();

        app.set_holdings("150").unwrap();
        assert_eq!(app.held_tokens, dec!(150));
        assert_eq!(app.metrics.unwrap().holdings_value, dec!(300));
    }

    #[test]
    fn invalid_holdings_leave_state_unchanged() {
        let mut app = App::new("0xabc");
        app.apply_prices(&records(&[ONE, 2 * ONE])).unwrap();
        app.set_holdings("10").unwrap();

        for input in ["", "abc", "  ", "-4", "12abc"] {
            assert!(app.set_holdings(input).is_err(), "accepted {input:?}");
            assert_eq!(app.held_tokens, dec!(10));
            assert_eq!(app.metrics.unwrap().holdings_value, dec!(20));
        }
    }

    #[test]
    fn holdings_before_prices_are_kept_for_later() {
        let mut app = App::new("0xabc");
        app.set_holdings("4").unwrap();
        app.apply_prices(&records(&[ONE / 2])).unwrap();
        assert_eq!(app.metrics.unwrap().holdings_value, dec!(2));
    }

    #[test]
    fn submit_clears_input_and_returns_to_normal() {
        let mut app = App::new("0xabc");
        app.mode = Mode::Insert;
        for c in "2.5".chars() {
            app.holdings_input.insert(c);
        }
        app.submit_holdings();

        assert_eq!(app.mode, Mode::Normal);
        assert!(app.holdings_input.is_empty());
        assert_eq!(app.held_tokens, dec!(2.5));
    }

    #[test]
    fn parses_plain_and_scientific_amounts() {
        assert_eq!(parse_holdings(" 12.5 ").unwrap(), dec!(12.5));
        assert_eq!(parse_holdings("1e3").unwrap(), dec!(1000));
        assert_eq!(parse_holdings("0").unwrap(), Decimal::ZERO);
        assert!(parse_holdings("abc").is_err());
    }

    #[test]
    fn scrolling_is_bounded_by_series_length() {
        let mut app = App::new("0xabc");
        app.apply_prices(&records(&[ONE, ONE, ONE])).unwrap();

        app.scroll_older(10);
        assert_eq!(app.scroll_back, 2);
        app.scroll_newer(5);
        assert_eq!(app.scroll_back, 0);
    }
}
