//! Token metadata model.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Response of the token metadata endpoint.
///
/// Only the supply is used; any other fields the API returns are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenInfo {
    /// Total token supply, as a JSON number or numeric string.
    pub total_supply: Decimal,
}
