//! Price history models.
//!
//! Prices arrive as integers scaled by 10^18. [`PriceRecord`] is the wire
//! shape returned by the price history endpoint; [`PriceSample`] is the
//! validated form the chart works with, and [`PriceSeries`] is a non-empty,
//! chronologically ordered run of samples.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::de::value::MapAccessDeserializer;
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;

use crate::{Result, TokenChartError};

/// Number of decimal places in a raw fixed-point price.
pub const PRICE_SCALE: u32 = 18;

/// One entry of the price history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceRecord {
    /// Price scaled by 10^18. Accepts JSON integers of any size or integer
    /// strings; every digit is kept.
    #[serde(deserialize_with = "deserialize_raw_price")]
    pub price: u128,
    /// When the price was recorded.
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
}

/// A single validated price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceSample {
    timestamp: DateTime<Utc>,
    raw_price: u128,
}

impl PriceSample {
    /// Builds a sample, checking that the raw price fits a decimal.
    ///
    /// # Errors
    ///
    /// Returns [`TokenChartError::InvalidPrice`] if `raw_price / 10^18`
    /// cannot be represented by [`Decimal`].
    pub fn new(timestamp: DateTime<Utc>, raw_price: u128) -> Result<Self> {
        scaled_to_decimal(raw_price)?;
        Ok(Self {
            timestamp,
            raw_price,
        })
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn raw_price(&self) -> u128 {
        self.raw_price
    }

    /// The decimal price (`raw_price / 10^18`), recomputed on every call.
    pub fn price(&self) -> Decimal {
        // Representability was checked in `new`.
        scaled_to_decimal(self.raw_price).unwrap_or(Decimal::ZERO)
    }
}

impl TryFrom<&PriceRecord> for PriceSample {
    type Error = TokenChartError;

    fn try_from(record: &PriceRecord) -> Result<Self> {
        Self::new(record.created_at, record.price)
    }
}

/// Converts a raw fixed-point price into its exact decimal value.
///
/// # Errors
///
/// Returns [`TokenChartError::InvalidPrice`] when the value exceeds the
/// 96-bit mantissa of [`Decimal`].
pub fn scaled_to_decimal(raw_price: u128) -> Result<Decimal> {
    let mantissa = i128::try_from(raw_price)
        .map_err(|_| TokenChartError::InvalidPrice(format!("{raw_price} is out of range")))?;
    Decimal::try_from_i128_with_scale(mantissa, PRICE_SCALE)
        .map_err(|e| TokenChartError::InvalidPrice(format!("{raw_price}: {e}")))
}

/// Ordered, non-empty sequence of price samples.
///
/// Samples are kept in the order given; the caller guarantees they are
/// chronological.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSeries {
    samples: Vec<PriceSample>,
}

impl PriceSeries {
    /// Wraps `samples` as a series.
    ///
    /// # Errors
    ///
    /// Returns [`TokenChartError::EmptySeries`] if `samples` is empty.
    pub fn new(samples: Vec<PriceSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(TokenChartError::EmptySeries);
        }
        Ok(Self { samples })
    }

    /// Validates and converts wire records into a series.
    ///
    /// # Errors
    ///
    /// Fails on the first unrepresentable price, or with
    /// [`TokenChartError::EmptySeries`] when `records` is empty.
    pub fn from_records(records: &[PriceRecord]) -> Result<Self> {
        let samples = records
            .iter()
            .map(PriceSample::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(samples)
    }

    pub fn samples(&self) -> &[PriceSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> &PriceSample {
        &self.samples[0]
    }

    pub fn last(&self) -> &PriceSample {
        &self.samples[self.samples.len() - 1]
    }
}

fn deserialize_raw_price<'de, D>(deserializer: D) -> std::result::Result<u128, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(RawPriceVisitor)
}

struct RawPriceVisitor;

impl<'de> Visitor<'de> for RawPriceVisitor {
    type Value = u128;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative integer or integer string")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<u128, E> {
        Ok(u128::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<u128, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<u128, E> {
        u128::try_from(v).map_err(|_| E::custom(format!("negative price {v}")))
    }

    // serde_json hands numbers outside u64/i64 over as their literal text,
    // wrapped in a single-entry map.
    fn visit_map<A: MapAccess<'de>>(self, map: A) -> std::result::Result<u128, A::Error> {
        let number = serde_json::Number::deserialize(MapAccessDeserializer::new(map))?;
        let literal = number.to_string();
        literal
            .parse::<u128>()
            .map_err(|_| de::Error::custom(format!("price {literal} is not a non-negative integer")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<u128, E> {
        v.trim()
            .parse::<u128>()
            .map_err(|e| E::custom(format!("price {v:?}: {e}")))
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp {raw:?}")))
}

/// Parses an ISO-8601 timestamp. Values without an offset are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn price_divides_by_ten_to_the_eighteenth() {
        let sample = PriceSample::new(at(0), 1_500_000_000_000_000_000).unwrap();
        assert_eq!(sample.price(), dec!(1.5));

        let tiny = PriceSample::new(at(0), 1).unwrap();
        assert_eq!(tiny.price(), dec!(0.000000000000000001));
    }

    #[test]
    fn unrepresentable_price_is_rejected() {
        let err = PriceSample::new(at(0), u128::MAX).unwrap_err();
        assert!(matches!(err, TokenChartError::InvalidPrice(_)));
    }

    #[test]
    fn empty_series_is_rejected() {
        assert!(matches!(
            PriceSeries::new(Vec::new()),
            Err(TokenChartError::EmptySeries)
        ));
        assert!(matches!(
            PriceSeries::from_records(&[]),
            Err(TokenChartError::EmptySeries)
        ));
    }

    #[test]
    fn series_keeps_caller_order() {
        let later = PriceSample::new(at(100), 2).unwrap();
        let earlier = PriceSample::new(at(50), 1).unwrap();
        let series = PriceSeries::new(vec![later, earlier]).unwrap();

        assert_eq!(series.first(), &later);
        assert_eq!(series.last(), &earlier);
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn parses_timestamps_with_and_without_offset() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T13:30:00+01:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn record_accepts_string_and_large_integer_prices() {
        let json = r#"[
            {"price": "2500000000000000000", "created_at": "2024-03-01T12:30:00Z"},
            {"price": 20000000000000000000, "created_at": "2024-03-01T12:31:00Z"}
        ]"#;
        let records: Vec<PriceRecord> = serde_json::from_str(json).unwrap();

        let series = PriceSeries::from_records(&records).unwrap();
        assert_eq!(series.first().price(), dec!(2.5));
        assert_eq!(series.last().price(), dec!(20));
    }

    #[test]
    fn integer_beyond_f64_precision_keeps_every_digit() {
        let json = r#"{"price": 123456789012345678901, "created_at": "2024-03-01T12:30:00Z"}"#;
        let record: PriceRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.price, 123_456_789_012_345_678_901);
        let sample = PriceSample::try_from(&record).unwrap();
        assert_eq!(sample.price(), dec!(123.456789012345678901));
    }

    #[test]
    fn record_rejects_fractional_and_large_negative_numbers() {
        for price in ["1.5", "2e19", "-123456789012345678901"] {
            let json = format!(r#"{{"price": {price}, "created_at": "2024-03-01T12:30:00Z"}}"#);
            assert!(
                serde_json::from_str::<PriceRecord>(&json).is_err(),
                "accepted {price}"
            );
        }
    }

    #[test]
    fn record_rejects_negative_price() {
        let json = r#"{"price": -1, "created_at": "2024-03-01T12:30:00Z"}"#;
        assert!(serde_json::from_str::<PriceRecord>(json).is_err());
    }
}
