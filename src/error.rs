//! Crate-level error types.
//!
//! [`TokenChartError`] unifies every error source (configuration, HTTP,
//! JSON, and the chart computations themselves) behind a single enum so
//! callers can match on the variant they care about while still using the
//! `?` operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TokenChartError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum TokenChartError {
    /// A configuration value is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// TLS setup failed (CA file unreadable or not valid PEM).
    #[error("tls error: {0}")]
    Tls(String),

    /// Terminal or file I/O failed.
    #[error("io error: {0}")]
    Io(String),

    /// An HTTP request to the price API failed.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A price series with no samples was handed to a computation.
    #[error("price series is empty")]
    EmptySeries,

    /// The reference price is zero, so the percent change is undefined.
    #[error("reference price is zero")]
    ZeroReferencePrice,

    /// The user-entered holdings amount is not a usable number.
    #[error("invalid holdings amount: {0:?}")]
    InvalidHoldings(String),

    /// A raw fixed-point price cannot be represented as a decimal.
    #[error("invalid price: {0}")]
    InvalidPrice(String),

    /// A derived metric does not fit in a decimal.
    #[error("{0} overflowed")]
    Overflow(&'static str),
}
