//! Message types for communication between the dashboard and its worker.
//!
//! ```text
//! +------------------+     Command      +------------------+
//! |    UI Thread     | --------------> |   PanelWorker    |
//! |    (ratatui)     |                 |  (tokio runtime) |
//! |                  | <-------------- |                  |
//! +------------------+   PanelEvent    +------------------+
//! ```

use ledpanel_core::{AggregateRequest, HistoryListing};
use ledpanel_types::{ChartSeries, LedId, LedState};

/// Commands sent from the UI thread to the background worker.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Refresh every LED on the panel.
    RefreshAll,

    /// Flip one LED.
    Toggle {
        /// The LED to switch.
        id: LedId,
        /// The state the UI currently shows.
        current: bool,
    },

    /// Load an LED's history for the popup.
    ShowHistory {
        /// The LED whose history to load.
        id: LedId,
    },

    /// Load an aggregate for the chart panel.
    LoadChart(AggregateRequest),

    /// Stop the worker.
    Shutdown,
}

/// Events sent from the worker back to the UI thread.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// A refresh was started.
    RefreshStarted,

    /// A refresh finished; carries every LED in panel order.
    LedsUpdated(Vec<LedState>),

    /// A toggle succeeded.
    Toggled {
        /// The LED that was switched.
        id: LedId,
        /// Its new state.
        is_on: bool,
    },

    /// A toggle failed; local state is unchanged.
    ToggleFailed {
        /// The LED whose write failed.
        id: LedId,
        /// User-facing message.
        message: String,
        /// Full error text.
        details: String,
    },

    /// History loaded for the popup.
    History {
        /// The LED the listing belongs to.
        id: LedId,
        /// The listing to show.
        listing: HistoryListing,
    },

    /// Chart data loaded.
    Chart(ChartSeries),
}
