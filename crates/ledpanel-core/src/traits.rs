//! Trait abstraction over the remote LED service.
//!
//! [`LedService`] is implemented by the HTTP [`LedClient`](crate::LedClient)
//! and by [`MockLedService`](crate::MockLedService), so [`StatusSync`](crate::StatusSync)
//! and [`HistoryView`](crate::HistoryView) work against either.

use async_trait::async_trait;

use ledpanel_types::{HistoryRecord, LedId, SessionReport, StateSample, TimeTotal};

use crate::error::Result;

/// Operations offered by the remote LED service.
///
/// # Example
///
/// ```ignore
/// use ledpanel_core::{LedService, Result};
/// use ledpanel_types::LedId;
///
/// async fn print_latest<S: LedService>(service: &S, id: LedId) -> Result<()> {
///     if let Some(record) = service.latest_record(id).await? {
///         println!("{}", record.summary_line());
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait LedService: Send + Sync {
    // --- Reads ---

    /// History log for one LED, newest first.
    async fn history(&self, id: LedId) -> Result<Vec<HistoryRecord>>;

    /// Most recent history record, if any.
    async fn latest_record(&self, id: LedId) -> Result<Option<HistoryRecord>> {
        Ok(self.history(id).await?.into_iter().next())
    }

    // --- Writes ---

    /// Request that an LED be switched on or off.
    async fn set_state(&self, id: LedId, on: bool) -> Result<()>;

    // --- Aggregates ---

    /// On/off hour totals for every LED.
    async fn time_totals(&self) -> Result<Vec<TimeTotal>>;

    /// Binary state samples for one LED.
    async fn state_samples(&self, id: LedId) -> Result<Vec<StateSample>>;

    /// Per-session duration reports for one LED.
    async fn session_reports(&self, id: LedId) -> Result<Vec<SessionReport>>;
}
