//! Configuration for quote_poller_rust

use anyhow::{anyhow, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Base URL of the market-data backend.
    pub base_url: String,

    /// Comma-separated symbols to poll.
    pub symbols: String,

    /// Auto-refresh toggle and cadence.
    pub auto_refresh: bool,
    pub refresh_interval_ms: u64,

    /// Desired live-data flag state; None leaves the backend as-is.
    pub live_data: Option<bool>,
}

impl PollerConfig {
    pub fn from_env() -> Result<Self> {
        let refresh_interval_ms = parse_u64("REFRESH_INTERVAL_MS", 5000)?;
        if refresh_interval_ms == 0 {
            return Err(anyhow!("REFRESH_INTERVAL_MS must be > 0"));
        }

        Ok(Self {
            base_url: env::var("MARKET_DATA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),

            symbols: env::var("QUOTE_SYMBOLS")
                .unwrap_or_else(|_| "RELIANCE,TCS,INFY".to_string()),

            auto_refresh: parse_bool("AUTO_REFRESH", true)?,
            refresh_interval_ms,

            live_data: match env::var("LIVE_DATA") {
                Ok(val) => Some(
                    val.to_lowercase()
                        .parse()
                        .map_err(|_| anyhow!("LIVE_DATA must be true or false"))?,
                ),
                Err(_) => None,
            },
        })
    }
}

/// Parse environment variable as u64 with default fallback
fn parse_u64(var_name: &str, default: u64) -> Result<u64> {
    match env::var(var_name) {
        Ok(val) => val
            .parse()
            .map_err(|_| anyhow!("{} must be a valid u64", var_name)),
        Err(_) => Ok(default),
    }
}

/// Parse environment variable as bool with default fallback
fn parse_bool(var_name: &str, default: bool) -> Result<bool> {
    match env::var(var_name) {
        Ok(val) => val
            .to_lowercase()
            .parse()
            .map_err(|_| anyhow!("{} must be true or false", var_name)),
        Err(_) => Ok(default),
    }
}
