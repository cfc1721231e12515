//! Log-backed UI sink: rendered rows and error messages go to the log.

use log::{debug, error, info};
use quotes_core::{QuoteResult, UiSink};

pub struct LogSink;

impl UiSink for LogSink {
    fn set_loading(&self, loading: bool) {
        debug!("loading = {}", loading);
    }

    fn show_quotes(&self, quotes: &[QuoteResult]) {
        info!("--- {} quotes ---", quotes.len());
        for quote in quotes {
            match &quote.error {
                Some(err) => info!("{:<12} {}", quote.symbol, err),
                None => {
                    let price = quote
                        .last_price
                        .map(|p| format!("{:.2}", p))
                        .unwrap_or_else(|| "-".to_string());
                    let when = quote
                        .parsed_timestamp()
                        .map(|t| t.format("%H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    info!("{:<12} {:>10}  {}", quote.symbol, price, when);
                }
            }
        }
    }

    fn report_error(&self, message: &str) {
        error!("{}", message);
    }
}
