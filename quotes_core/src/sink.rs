//! Seam to the hosting UI's state store.
//!
//! The core pushes results and status out through this trait and consumes
//! nothing back; how rows are rendered or how long an error stays on
//! screen is the host's concern.

use crate::types::QuoteResult;

/// Receiver for results and status produced by the polling core.
///
/// Implementations must be Send + Sync: scheduled fetches run on spawned
/// tasks and report through a shared handle.
pub trait UiSink: Send + Sync {
    /// Loading indicator around one batch fetch.
    fn set_loading(&self, _loading: bool) {}

    /// A complete reconciled result set, one entry per requested symbol.
    fn show_quotes(&self, quotes: &[QuoteResult]);

    /// One user-facing message per failed operation.
    fn report_error(&self, message: &str);
}
