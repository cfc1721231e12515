//! Backend market-data transport.
//!
//! Defines the [`MarketDataApi`] trait the rest of the core programs
//! against, plus the wire types of the backend contract. The production
//! implementation lives in [`http`]; tests substitute in-memory fakes.

pub mod http;

use crate::types::SymbolSet;
use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;

pub use http::HttpMarketDataClient;

/// Provider identifier sent with every flag mutation.
pub const FLAG_PROVIDER: &str = "upstox";

/// Response body of `GET /live-data-flag` and `POST /live-data-flag`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LiveDataFlag {
    pub enabled: bool,
}

/// Per-symbol payload inside the batch response data map.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteData {
    #[serde(default)]
    pub last_price: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Response body of `GET /quotes-batch`.
///
/// `symbols_requested` and `symbols_returned` are both optional: missing
/// symbols can only be detected when the backend echoes the request list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuotesBatchResponse {
    #[serde(default)]
    pub symbols_requested: Option<Vec<String>>,
    #[serde(default)]
    pub symbols_returned: Option<Vec<String>>,
    #[serde(default)]
    pub data: HashMap<String, QuoteData>,
}

/// Transport to the market-data backend.
///
/// Implementations must be Send + Sync for use from spawned fetch tasks.
/// Transport and decode failures are indistinguishable to callers; both
/// surface as an error on the operation as a whole.
#[async_trait]
pub trait MarketDataApi: Send + Sync {
    /// Read the current live-data flag.
    async fn read_live_data_flag(&self) -> Result<bool>;

    /// Request the flag be set to `enabled`; returns the backend's echoed
    /// authoritative state, which may differ from the request.
    async fn write_live_data_flag(&self, enabled: bool) -> Result<bool>;

    /// Fetch one batch of quotes for the given symbol set.
    async fn fetch_quotes_batch(&self, symbols: &SymbolSet) -> Result<QuotesBatchResponse>;
}
