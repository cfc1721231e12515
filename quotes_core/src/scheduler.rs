//! Auto-refresh scheduling for batch quote fetches.

use crate::fetcher::QuoteFetcher;
use crate::sink::UiSink;
use crate::types::{QuoteResult, RefreshConfig, SymbolSet};
use log::{debug, info};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Decides when the [`QuoteFetcher`] runs.
///
/// A two-state machine over {idle, scheduled}. Enabling auto-refresh, or
/// changing the interval or symbol set while enabled, tears down the
/// existing timer and arms a fresh one, so at most one timer is armed at
/// any instant. Disabling or dropping the scheduler cancels the pending
/// timer unconditionally; an in-flight fetch is allowed to complete and
/// report its outcome even after the scheduler has gone idle.
///
/// Each tick dispatches its own fetch task, so a slow response never
/// blocks subsequent ticks. Overlapping fetches resolve last-response-wins
/// at the sink; tagging fetches with a monotonic sequence number and
/// dropping stale responses is a known hardening left to the host.
pub struct RefreshScheduler {
    fetcher: Arc<QuoteFetcher>,
    sink: Arc<dyn UiSink>,
    config: RefreshConfig,
    symbols: SymbolSet,
    timer: Option<JoinHandle<()>>,
}

impl RefreshScheduler {
    pub fn new(fetcher: Arc<QuoteFetcher>, sink: Arc<dyn UiSink>) -> Self {
        Self {
            fetcher,
            sink,
            config: RefreshConfig::default(),
            symbols: SymbolSet::default(),
            timer: None,
        }
    }

    /// True while a timer is armed.
    pub fn is_scheduled(&self) -> bool {
        self.timer.is_some()
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    /// Replace the session parameters wholesale and re-arm.
    ///
    /// Any previously armed timer is torn down first; a fresh one is armed
    /// only when the new config is enabled. The symbol set captured here is
    /// the one ticks will fetch; any later change must come back through
    /// `apply` (or the setters, which do), which re-arms.
    pub fn apply(&mut self, config: RefreshConfig, symbols: SymbolSet) {
        self.cancel();
        self.config = config;
        self.symbols = symbols;
        if self.config.enabled {
            self.arm();
        }
    }

    /// Flip the auto-refresh toggle.
    pub fn set_enabled(&mut self, enabled: bool) {
        let config = RefreshConfig {
            enabled,
            ..self.config.clone()
        };
        let symbols = self.symbols.clone();
        self.apply(config, symbols);
    }

    /// Change the refresh interval. Re-arms when enabled.
    pub fn set_interval_ms(&mut self, interval_ms: u64) {
        let config = RefreshConfig {
            interval_ms,
            ..self.config.clone()
        };
        let symbols = self.symbols.clone();
        self.apply(config, symbols);
    }

    /// Change the symbol set. Re-arms when enabled, so ticks always fetch
    /// the current set.
    pub fn set_symbols(&mut self, symbols: SymbolSet) {
        let config = self.config.clone();
        self.apply(config, symbols);
    }

    /// One user-requested fetch, permitted regardless of scheduler state.
    /// Does not touch the armed timer.
    pub async fn fetch_now(&self) -> Vec<QuoteResult> {
        self.fetcher
            .fetch_batch(&self.symbols, self.sink.as_ref())
            .await
    }

    /// Cancel the pending timer, if any. In-flight fetches are not
    /// cancelled; they run to completion.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
            debug!("Auto-refresh timer cancelled");
        }
    }

    fn arm(&mut self) {
        let period = self.config.effective_interval();
        let fetcher = self.fetcher.clone();
        let sink = self.sink.clone();
        let symbols = self.symbols.clone();

        info!(
            "Auto-refresh armed: every {:?} for [{}]",
            period, self.symbols
        );

        // First tick one full period after arming, not immediately.
        let start = Instant::now() + period;
        let timer = tokio::spawn(async move {
            let mut ticker = interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let fetcher = fetcher.clone();
                let sink = sink.clone();
                let symbols = symbols.clone();
                tokio::spawn(async move {
                    fetcher.fetch_batch(&symbols, sink.as_ref()).await;
                });
            }
        });
        self.timer = Some(timer);
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        // A timer that keeps firing after the owning session ended is a
        // leak; tear it down with the scheduler.
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::{MarketDataApi, QuotesBatchResponse};
    use anyhow::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Backend fake that records the paused-clock instant of every batch
    /// call and returns an empty successful response.
    #[derive(Default)]
    struct TickRecorder {
        fetches: Mutex<Vec<(Instant, SymbolSet)>>,
    }

    impl TickRecorder {
        fn fetch_count(&self) -> usize {
            self.fetches.lock().unwrap().len()
        }

        fn fetch_instants(&self) -> Vec<Instant> {
            self.fetches.lock().unwrap().iter().map(|f| f.0).collect()
        }
    }

    #[async_trait]
    impl MarketDataApi for TickRecorder {
        async fn read_live_data_flag(&self) -> Result<bool> {
            unreachable!("scheduler tests never read the flag")
        }

        async fn write_live_data_flag(&self, _enabled: bool) -> Result<bool> {
            unreachable!("scheduler tests never write the flag")
        }

        async fn fetch_quotes_batch(&self, symbols: &SymbolSet) -> Result<QuotesBatchResponse> {
            self.fetches
                .lock()
                .unwrap()
                .push((Instant::now(), symbols.clone()));
            Ok(QuotesBatchResponse::default())
        }
    }

    struct NullSink;

    impl UiSink for NullSink {
        fn show_quotes(&self, _quotes: &[QuoteResult]) {}
        fn report_error(&self, _message: &str) {}
    }

    fn scheduler_with_recorder() -> (RefreshScheduler, Arc<TickRecorder>) {
        let api = Arc::new(TickRecorder::default());
        let fetcher = Arc::new(QuoteFetcher::new(api.clone()));
        let scheduler = RefreshScheduler::new(fetcher, Arc::new(NullSink));
        (scheduler, api)
    }

    fn enabled(interval_ms: u64) -> RefreshConfig {
        RefreshConfig {
            enabled: true,
            interval_ms,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_floor_enforced() {
        let (mut scheduler, api) = scheduler_with_recorder();
        scheduler.apply(enabled(500), SymbolSet::parse("TCS"));

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert_eq!(api.fetch_count(), 0, "tick fired before the 1s floor");

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(api.fetch_count(), 1);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(api.fetch_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_after_one_full_period() {
        let (mut scheduler, api) = scheduler_with_recorder();
        scheduler.apply(enabled(5000), SymbolSet::parse("TCS"));

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert_eq!(api.fetch_count(), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(api.fetch_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_change_rearms_single_timer() {
        let (mut scheduler, api) = scheduler_with_recorder();
        scheduler.apply(enabled(2000), SymbolSet::parse("TCS"));

        tokio::time::sleep(Duration::from_millis(1500)).await;
        scheduler.set_interval_ms(3000);
        assert!(scheduler.is_scheduled());

        // The old timer would have fired at t=2000; the re-armed one fires
        // a full new period after the change, at t=4500.
        tokio::time::sleep(Duration::from_millis(1000)).await; // t=2500
        assert_eq!(api.fetch_count(), 0, "old timer fired after re-arm");

        tokio::time::sleep(Duration::from_millis(2100)).await; // t=4600
        assert_eq!(api.fetch_count(), 1);

        // No two ticks closer than the floor-adjusted interval.
        tokio::time::sleep(Duration::from_millis(9000)).await;
        let instants = api.fetch_instants();
        assert!(instants.len() >= 3);
        for pair in instants.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(3000));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_symbol_change_rearms_and_ticks_use_current_set() {
        let (mut scheduler, api) = scheduler_with_recorder();
        scheduler.apply(enabled(1000), SymbolSet::parse("TCS"));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        scheduler.set_symbols(SymbolSet::parse("TCS,INFY"));
        tokio::time::sleep(Duration::from_millis(1100)).await;

        let fetches = api.fetches.lock().unwrap();
        assert_eq!(fetches.len(), 2);
        assert_eq!(fetches[0].1.symbols(), &["TCS"]);
        assert_eq!(fetches[1].1.symbols(), &["TCS", "INFY"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disable_cancels_pending_ticks() {
        let (mut scheduler, api) = scheduler_with_recorder();
        scheduler.apply(enabled(1000), SymbolSet::parse("TCS"));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(api.fetch_count(), 2);

        scheduler.set_enabled(false);
        assert!(!scheduler.is_scheduled());

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(api.fetch_count(), 2, "fetch fired after disablement");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timer() {
        let (mut scheduler, api) = scheduler_with_recorder();
        scheduler.apply(enabled(1000), SymbolSet::parse("TCS"));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(api.fetch_count(), 1);

        drop(scheduler);
        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(api.fetch_count(), 1, "timer leaked past teardown");
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_fetch_independent_of_timer() {
        let (mut scheduler, api) = scheduler_with_recorder();

        // Manual fetch while idle is permitted.
        scheduler.set_symbols(SymbolSet::parse("TCS"));
        scheduler.fetch_now().await;
        assert_eq!(api.fetch_count(), 1);
        assert!(!scheduler.is_scheduled());

        // Manual fetch while scheduled does not disturb the armed timer.
        scheduler.set_enabled(true);
        tokio::time::sleep(Duration::from_millis(5100)).await;
        assert_eq!(api.fetch_count(), 2, "set_enabled uses default interval");

        scheduler.fetch_now().await;
        assert_eq!(api.fetch_count(), 3);
        tokio::time::sleep(Duration::from_millis(5000)).await; // next scheduled tick
        assert_eq!(api.fetch_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_enable_with_empty_symbols_issues_no_requests() {
        let (mut scheduler, api) = scheduler_with_recorder();
        scheduler.apply(enabled(1000), SymbolSet::default());

        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(api.fetch_count(), 0);
        assert!(scheduler.is_scheduled());
    }
}
