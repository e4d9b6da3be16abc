//! Shared test utilities and constants.

use chrono::{DateTime, TimeZone, Utc};
use tokenchart::models::PriceRecord;

/// Contract address used by the fixtures.
pub const CONTRACT: &str = "0xCf52025D37f68dEdA9ef8307Ba4474eCbf15C33c";

pub const PRICES_JSON: &str = include_str!("../fixtures/prices.json");
pub const TOKEN_JSON: &str = include_str!("../fixtures/token.json");

/// The moment the fixture history is observed from.
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap()
}

pub fn fixture_records() -> Vec<PriceRecord> {
    serde_json::from_str(PRICES_JSON).expect("Failed to deserialize price fixture")
}
