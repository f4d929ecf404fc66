//! HTTP quote-proxy source.
//!
//! The application fronts its market-data vendor with a small proxy exposing
//! `GET {base}/quote?symbol=SYM` returning `{"price": <number>}`. Vendor
//! selection, API keys and caching all live behind the proxy.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use super::{Quote, QuoteSource};

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    price: Option<Decimal>,
}

/// Quote source backed by the application's market-data proxy.
pub struct ProxyQuoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl ProxyQuoteSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Overrides the proxy endpoint; used by tests to point at a mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait::async_trait]
impl QuoteSource for ProxyQuoteSource {
    async fn fetch_quote(&self, symbol: &str) -> Result<Option<Quote>> {
        let url = format!("{}/quote", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await
            .with_context(|| format!("Quote request failed for {symbol}"))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!(symbol, "quote proxy has no data for symbol");
            return Ok(None);
        }
        let response = response
            .error_for_status()
            .with_context(|| format!("Quote proxy returned an error for {symbol}"))?;

        let body: QuoteResponse = response
            .json()
            .await
            .with_context(|| format!("Invalid quote payload for {symbol}"))?;

        Ok(body.price.map(|price| Quote { price }))
    }
}
