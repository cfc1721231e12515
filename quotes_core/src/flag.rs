//! Remote live-data flag control.

use crate::clients::MarketDataApi;
use crate::sink::UiSink;
use crate::types::FlagState;
use log::{debug, warn};
use std::sync::Arc;

/// Owns the last observed [`FlagState`] and the two operations on it.
///
/// State only ever changes to what the backend reported: a failed call
/// leaves the previous value untouched, and a toggle adopts the backend's
/// echoed boolean rather than the locally computed negation. A concurrent
/// toggle from elsewhere therefore cannot be silently overwritten.
pub struct FlagController {
    api: Arc<dyn MarketDataApi>,
    state: FlagState,
}

impl FlagController {
    pub fn new(api: Arc<dyn MarketDataApi>) -> Self {
        Self {
            api,
            state: FlagState::Unknown,
        }
    }

    pub fn state(&self) -> FlagState {
        self.state
    }

    /// Read the remote flag. On failure the previous state is kept and a
    /// message is reported; no retry is attempted.
    pub async fn read(&mut self, sink: &dyn UiSink) -> FlagState {
        match self.api.read_live_data_flag().await {
            Ok(enabled) => {
                self.state = FlagState::from_bool(enabled);
                debug!("Live-data flag read: {:?}", self.state);
            }
            Err(e) => {
                warn!("Live-data flag read failed: {:#}", e);
                sink.report_error("Failed to read live-data flag");
            }
        }
        self.state
    }

    /// Request the logical negation of the current state.
    ///
    /// A no-op while the flag has never been read: the desired inverse is
    /// undefined, so no network call is issued. On success the backend's
    /// echoed boolean becomes the new state, whatever it is.
    pub async fn toggle(&mut self, sink: &dyn UiSink) -> FlagState {
        let Some(current) = self.state.as_bool() else {
            debug!("Toggle ignored: live-data flag has not been read yet");
            return self.state;
        };

        match self.api.write_live_data_flag(!current).await {
            Ok(echoed) => {
                self.state = FlagState::from_bool(echoed);
                debug!("Live-data flag toggled, backend reports: {:?}", self.state);
            }
            Err(e) => {
                warn!("Live-data flag toggle failed: {:#}", e);
                sink.report_error("Failed to toggle live-data flag");
            }
        }
        self.state
    }
}
