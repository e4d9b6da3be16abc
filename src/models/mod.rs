//! API and chart data models.
//!
//! [`token`] holds the token metadata response, [`price`] the price history
//! records and the validated sample/series types built from them.

pub mod price;
pub mod token;

pub use price::{PriceRecord, PriceSample, PriceSeries};
pub use token::TokenInfo;
