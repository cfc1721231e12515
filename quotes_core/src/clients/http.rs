//! HTTP implementation of the market-data backend contract.
//!
//! Endpoints:
//! - `GET  {base}/live-data-flag`
//! - `POST {base}/live-data-flag` with `{ provider, enabled }`
//! - `GET  {base}/quotes-batch?symbols=A,B,C`

use super::{LiveDataFlag, MarketDataApi, QuotesBatchResponse, FLAG_PROVIDER};
use crate::types::SymbolSet;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct FlagUpdate<'a> {
    provider: &'a str,
    enabled: bool,
}

/// reqwest-backed client for the market-data backend.
pub struct HttpMarketDataClient {
    client: Client,
    base_url: String,
}

impl HttpMarketDataClient {
    /// Create a client against the given base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("LiveQuotes/1.0")
            .build()
            .expect("Failed to create HTTP client");

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl MarketDataApi for HttpMarketDataClient {
    async fn read_live_data_flag(&self) -> Result<bool> {
        let url = format!("{}/live-data-flag", self.base_url);
        debug!("Reading live-data flag from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to read live-data flag")?;

        if !response.status().is_success() {
            return Err(anyhow!("Live-data flag read error: {}", response.status()));
        }

        let flag: LiveDataFlag = response
            .json()
            .await
            .context("Failed to parse live-data flag response")?;

        Ok(flag.enabled)
    }

    async fn write_live_data_flag(&self, enabled: bool) -> Result<bool> {
        let url = format!("{}/live-data-flag", self.base_url);
        debug!("Writing live-data flag enabled={} to {}", enabled, url);

        let response = self
            .client
            .post(&url)
            .json(&FlagUpdate {
                provider: FLAG_PROVIDER,
                enabled,
            })
            .send()
            .await
            .context("Failed to write live-data flag")?;

        if !response.status().is_success() {
            return Err(anyhow!("Live-data flag write error: {}", response.status()));
        }

        let flag: LiveDataFlag = response
            .json()
            .await
            .context("Failed to parse live-data flag response")?;

        Ok(flag.enabled)
    }

    async fn fetch_quotes_batch(&self, symbols: &SymbolSet) -> Result<QuotesBatchResponse> {
        let url = format!("{}/quotes-batch", self.base_url);
        debug!("Fetching quotes batch for {} symbols", symbols.len());

        let response = self
            .client
            .get(&url)
            .query(&[("symbols", symbols.to_query())])
            .send()
            .await
            .context("Failed to fetch quotes batch")?;

        if !response.status().is_success() {
            return Err(anyhow!("Quotes batch error: {}", response.status()));
        }

        let batch: QuotesBatchResponse = response
            .json()
            .await
            .context("Failed to parse quotes batch response")?;

        Ok(batch)
    }
}
