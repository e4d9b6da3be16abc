//! Live price chart for a single token.
//!
//! Fetches a token's price history over HTTP, derives the current price,
//! 24h change, market cap and holdings value, and lays the history out as
//! a stacked bar chart rendered in the terminal.

pub mod api;
pub mod chart;
pub mod config;
pub mod error;
pub mod models;
pub mod refresh;
pub mod tls;
pub mod tui;

pub use error::{Result, TokenChartError};
