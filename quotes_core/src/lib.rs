//! Live-quotes polling core.
//!
//! This library provides:
//! - Remote live-data flag control with backend-echo-as-authority toggling
//! - Batch quote fetching with requested/returned symbol reconciliation
//! - Auto-refresh scheduling with a single cancellable timer per session
//!
//! The backend is reached through the [`clients::MarketDataApi`] trait so
//! services and tests can substitute their own transport. UI state (rows,
//! loading flag, error messages) is pushed out through [`sink::UiSink`].

pub mod clients;
pub mod fetcher;
pub mod flag;
pub mod scheduler;
pub mod sink;
pub mod types;

pub use fetcher::QuoteFetcher;
pub use flag::FlagController;
pub use scheduler::RefreshScheduler;
pub use sink::UiSink;
pub use types::{FlagState, QuoteResult, RefreshConfig, SymbolSet};
