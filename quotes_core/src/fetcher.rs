//! Batch quote fetching and requested/returned reconciliation.

use crate::clients::{MarketDataApi, QuotesBatchResponse};
use crate::sink::UiSink;
use crate::types::{QuoteResult, SymbolSet};
use log::{debug, warn};
use std::collections::HashSet;
use std::sync::Arc;

/// Performs one batch retrieval and reconciles the outcome per symbol.
pub struct QuoteFetcher {
    api: Arc<dyn MarketDataApi>,
}

impl QuoteFetcher {
    pub fn new(api: Arc<dyn MarketDataApi>) -> Self {
        Self { api }
    }

    /// Fetch one batch for `symbols` and push the outcome to the sink.
    ///
    /// A transport or decode failure fails the call as a whole: the sink
    /// gets "Failed to fetch quotes" and the returned sequence is empty.
    /// No partial results are synthesized from a failed call. An empty
    /// symbol set issues no request at all.
    pub async fn fetch_batch(&self, symbols: &SymbolSet, sink: &dyn UiSink) -> Vec<QuoteResult> {
        if symbols.is_empty() {
            debug!("Skipping quotes fetch: no symbols requested");
            sink.show_quotes(&[]);
            return Vec::new();
        }

        sink.set_loading(true);
        let results = match self.api.fetch_quotes_batch(symbols).await {
            Ok(response) => {
                let results = reconcile(&response);
                debug!(
                    "Fetched {} of {} requested symbols",
                    results.iter().filter(|r| r.error.is_none()).count(),
                    symbols.len()
                );
                sink.show_quotes(&results);
                results
            }
            Err(e) => {
                warn!("Quotes batch fetch failed: {:#}", e);
                sink.report_error("Failed to fetch quotes");
                Vec::new()
            }
        };
        sink.set_loading(false);
        results
    }
}

/// Compute the complete per-symbol outcome from one successful response.
///
/// Returned symbols come first, in the order the backend listed them, with
/// price and timestamp pulled from the data map (absent fields stay None).
/// Symbols the backend echoed in `symbols_requested` but did not return are
/// appended with `error = "no data"`. Missing symbols can only be detected
/// from the echoed request list; when the backend omits it, nothing is
/// appended. Consumers should treat the result as a set keyed by symbol.
pub fn reconcile(response: &QuotesBatchResponse) -> Vec<QuoteResult> {
    let returned: &[String] = response.symbols_returned.as_deref().unwrap_or(&[]);

    let mut results: Vec<QuoteResult> = returned
        .iter()
        .map(|symbol| {
            let data = response.data.get(symbol);
            QuoteResult::with_data(
                symbol.clone(),
                data.and_then(|d| d.last_price),
                data.and_then(|d| d.timestamp.clone()),
            )
        })
        .collect();

    if let Some(requested) = &response.symbols_requested {
        let returned_set: HashSet<&str> = returned.iter().map(String::as_str).collect();
        for symbol in requested {
            if !returned_set.contains(symbol.as_str()) {
                results.push(QuoteResult::no_data(symbol.clone()));
            }
        }
    }

    results
}
