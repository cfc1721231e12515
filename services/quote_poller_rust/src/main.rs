mod config;
mod sink;

use anyhow::Result;
use config::PollerConfig;
use log::{info, warn};
use quotes_core::clients::HttpMarketDataClient;
use quotes_core::{FlagController, QuoteFetcher, RefreshConfig, RefreshScheduler, SymbolSet};
use sink::LogSink;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    info!("Starting quote_poller_rust...");

    let config = PollerConfig::from_env()?;
    let symbols = SymbolSet::parse(&config.symbols);
    info!(
        "Polling [{}] against {} (auto_refresh: {}, interval: {}ms)",
        symbols, config.base_url, config.auto_refresh, config.refresh_interval_ms
    );

    let api = Arc::new(HttpMarketDataClient::new(config.base_url.clone()));
    let sink: Arc<LogSink> = Arc::new(LogSink);
    let mut flag = FlagController::new(api.clone());
    let fetcher = Arc::new(QuoteFetcher::new(api));

    // Read the flag once, then reconcile against the desired state if one
    // was configured. Toggle stays a no-op if the read failed (unread flag).
    let state = flag.read(sink.as_ref()).await;
    info!("Live-data flag: {:?}", state);
    if let Some(want) = config.live_data {
        if state.as_bool().is_some_and(|current| current != want) {
            let state = flag.toggle(sink.as_ref()).await;
            info!("Live-data flag now: {:?}", state);
        } else if state.as_bool().is_none() {
            warn!("LIVE_DATA set but flag is unread; leaving backend as-is");
        }
    }

    let mut scheduler = RefreshScheduler::new(fetcher, sink);
    scheduler.apply(
        RefreshConfig {
            enabled: config.auto_refresh,
            interval_ms: config.refresh_interval_ms,
        },
        symbols,
    );

    // One immediate fetch so the first rows appear before the first tick.
    scheduler.fetch_now().await;

    tokio::signal::ctrl_c().await?;
    info!("Shutting down, cancelling auto-refresh");
    scheduler.cancel();

    Ok(())
}
