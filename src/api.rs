//! HTTP client for the token and token price endpoints.
//!
//! - `GET {base}/tokens/{contract}` returns the token metadata
//! - `GET {base}/token_prices/{contract}` returns the price history
//!
//! Every request carries a fresh `cache` query parameter so intermediaries
//! never serve a stale history.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::Result;
use crate::config::ApiConfig;
use crate::models::{PriceRecord, TokenInfo};
use crate::tls::build_tls_config;

/// Upper bound on a single request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Last cache-busting value handed out.
static LAST_CACHE_KEY: AtomicU64 = AtomicU64::new(0);

/// Source of token metadata and price history.
pub trait PriceFeed: Send + Sync + 'static {
    /// Fetches the token's metadata.
    fn fetch_token(&self) -> impl Future<Output = Result<TokenInfo>> + Send;

    /// Fetches the full price history, oldest first.
    fn fetch_prices(&self) -> impl Future<Output = Result<Vec<PriceRecord>>> + Send;
}

/// REST client bound to one token contract.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    contract: String,
}

impl ApiClient {
    /// Builds a client from configuration, including its TLS roots.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS configuration or HTTP client cannot be
    /// built.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let tls = build_tls_config(config.ca_cert.as_deref())?;
        Self::with_tls(&config.base_url, &config.contract, tls)
    }

    /// Builds a client using an explicit TLS configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TokenChartError::Tls`](crate::TokenChartError::Tls) if the
    /// HTTP client cannot be built.
    pub fn with_tls(
        base_url: &str,
        contract: &str,
        tls_config: rustls::ClientConfig,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .use_preconfigured_tls(tls_config)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| crate::TokenChartError::Tls(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            contract: contract.to_string(),
        })
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}/{}/{}", self.base_url, path, self.contract);
        let cache_key = next_cache_key().to_string();

        let response = self
            .http
            .get(&url)
            .query(&[("cache", cache_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        debug!(url = %url, bytes = body.len(), "Fetched");
        Ok(serde_json::from_str(&body)?)
    }
}

impl PriceFeed for ApiClient {
    async fn fetch_token(&self) -> Result<TokenInfo> {
        self.get_json("tokens").await
    }

    async fn fetch_prices(&self) -> Result<Vec<PriceRecord>> {
        self.get_json("token_prices").await
    }
}

/// Returns a strictly increasing cache-busting value based on the clock.
fn next_cache_key() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();

    let mut prev = LAST_CACHE_KEY.load(Ordering::Relaxed);
    loop {
        let key = now.max(prev + 1);
        match LAST_CACHE_KEY.compare_exchange_weak(prev, key, Ordering::Relaxed, Ordering::Relaxed)
        {
            Ok(_) => return key,
            Err(actual) => prev = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_keys_never_repeat() {
        let mut prev = next_cache_key();
        for _ in 0..1_000 {
            let current = next_cache_key();
            assert!(current > prev, "cache key did not increase: {prev} -> {current}");
            prev = current;
        }
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let tls = build_tls_config(None).unwrap();
        let client = ApiClient::with_tls("http://localhost:3000/", "0xabc", tls).unwrap();
        assert_eq!(client.base_url, "http://localhost:3000");
        assert_eq!(client.contract(), "0xabc");
    }
}
