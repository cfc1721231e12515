//! Core data types for the live-quotes polling subsystem.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Floor on the effective refresh period, to bound request rate against
/// the backend regardless of what the user configured.
pub const MIN_REFRESH_INTERVAL_MS: u64 = 1000;

/// Default refresh period when the user has not configured one.
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 5000;

/// An ordered set of ticker symbols, as the user typed them.
///
/// Parsed from a comma-separated input: segments are trimmed and empty
/// segments dropped. Duplicates are preserved on purpose (pass-through of
/// user intent); reconciliation downstream is keyed by symbol name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolSet(Vec<String>);

impl SymbolSet {
    pub fn new(symbols: Vec<String>) -> Self {
        Self(symbols)
    }

    /// Parse a comma-separated user input ("RELIANCE, TCS ,INFY").
    pub fn parse(input: &str) -> Self {
        Self(
            input
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn symbols(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined form for the batch request query string.
    pub fn to_query(&self) -> String {
        self.0.join(",")
    }
}

impl std::fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query())
    }
}

/// Per-symbol outcome of one batch fetch.
///
/// `last_price` and `timestamp` stay `None` when the backend omitted them;
/// a fabricated zero would be indistinguishable from a real last price of
/// zero. `error` carries per-symbol semantic gaps ("no data"), which are
/// data, not failures of the batch call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuoteResult {
    pub fn with_data(symbol: String, last_price: Option<f64>, timestamp: Option<String>) -> Self {
        Self {
            symbol,
            last_price,
            timestamp,
            error: None,
        }
    }

    /// Marker for a requested symbol the backend did not return.
    pub fn no_data(symbol: String) -> Self {
        Self {
            symbol,
            last_price: None,
            timestamp: None,
            error: Some("no data".to_string()),
        }
    }

    /// Parsed form of the ISO-8601 `timestamp`, for display formatting.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Last observed state of the remote live-data flag.
///
/// `Unknown` only exists before the first successful read; after that the
/// state mirrors the backend's last observed boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlagState {
    #[default]
    Unknown,
    Enabled,
    Disabled,
}

impl FlagState {
    pub fn from_bool(enabled: bool) -> Self {
        if enabled {
            Self::Enabled
        } else {
            Self::Disabled
        }
    }

    /// The mirrored boolean, or `None` while the flag has never been read.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Self::Unknown => None,
            Self::Enabled => Some(true),
            Self::Disabled => Some(false),
        }
    }
}

/// Auto-refresh settings for one scheduling session.
///
/// Replaced wholesale on any change (toggle flip, interval change, symbol
/// set change); never partially mutated while a timer is armed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshConfig {
    pub enabled: bool,
    pub interval_ms: u64,
}

impl RefreshConfig {
    /// Configured period with the floor applied.
    pub fn effective_interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(MIN_REFRESH_INTERVAL_MS))
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
        }
    }
}
