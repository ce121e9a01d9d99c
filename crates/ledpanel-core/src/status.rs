//! Reconciliation of local LED state with the remote service.
//!
//! [`StatusSync`] owns the list of LEDs shown by a panel. A refresh asks the
//! service for every LED's history concurrently and derives `is_on` from the
//! newest record. Toggles are optimistic: a successful write flips the local
//! flag without re-reading.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use ledpanel_types::{LedId, LedState, PowerState};

use crate::error::{Error, Result};
use crate::traits::LedService;

/// Local view of a set of LEDs, kept in sync with a [`LedService`].
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use ledpanel_core::{MockLedService, StatusSync};
/// use ledpanel_types::LedId;
///
/// #[tokio::main]
/// async fn main() {
///     let ids = [1, 2, 3].map(|n| LedId::new(n).unwrap());
///     let sync = StatusSync::new(Arc::new(MockLedService::new()), ids);
///     let leds = sync.refresh_all().await;
///     assert!(leds.iter().all(|led| !led.is_loading));
/// }
/// ```
pub struct StatusSync<S: LedService + ?Sized> {
    service: Arc<S>,
    leds: RwLock<Vec<LedState>>,
    refreshing: AtomicUsize,
}

impl<S: LedService + ?Sized> std::fmt::Debug for StatusSync<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusSync")
            .field("refreshing", &self.is_refreshing())
            .finish_non_exhaustive()
    }
}

/// Decrements the in-flight refresh counter when dropped.
struct RefreshGuard<'a>(&'a AtomicUsize);

impl<'a> RefreshGuard<'a> {
    fn new(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<S: LedService + ?Sized> StatusSync<S> {
    /// Create a panel with a loading placeholder per id.
    ///
    /// Duplicate ids are collapsed; order is preserved.
    pub fn new(service: Arc<S>, ids: impl IntoIterator<Item = LedId>) -> Self {
        let mut seen = HashSet::new();
        let leds = ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .map(LedState::placeholder)
            .collect();
        Self {
            service,
            leds: RwLock::new(leds),
            refreshing: AtomicUsize::new(0),
        }
    }

    /// The underlying service.
    pub fn service(&self) -> &Arc<S> {
        &self.service
    }

    /// Snapshot of every LED, in panel order.
    pub async fn leds(&self) -> Vec<LedState> {
        self.leds.read().await.clone()
    }

    /// Snapshot of one LED.
    pub async fn get(&self, id: LedId) -> Option<LedState> {
        self.leds.read().await.iter().find(|led| led.id == id).copied()
    }

    /// Identifiers in panel order.
    pub async fn ids(&self) -> Vec<LedId> {
        self.leds.read().await.iter().map(|led| led.id).collect()
    }

    /// Whether a refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst) > 0
    }

    /// Refresh every LED. See [`StatusSync::refresh`].
    pub async fn refresh_all(&self) -> Vec<LedState> {
        let ids = self.ids().await;
        self.refresh(&ids).await
    }

    /// Refresh the given LEDs concurrently and return the whole collection.
    ///
    /// Each LED is on when its newest history record is on. An empty history
    /// or a failed query leaves it off. Every refreshed LED stops loading
    /// regardless of the outcome. Ids not on the panel are ignored, and a
    /// repeated id is queried once.
    pub async fn refresh(&self, ids: &[LedId]) -> Vec<LedState> {
        let _guard = RefreshGuard::new(&self.refreshing);

        let known: Vec<LedId> = {
            let leds = self.leds.read().await;
            let mut seen = HashSet::new();
            ids.iter()
                .copied()
                .filter(|id| seen.insert(*id))
                .filter(|id| {
                    let present = leds.iter().any(|led| led.id == *id);
                    if !present {
                        debug!(led_id = id.get(), "Ignoring refresh for unknown LED");
                    }
                    present
                })
                .collect()
        };
        // Lock is released here

        let futures = known.iter().map(|&id| {
            let service = Arc::clone(&self.service);
            async move {
                let is_on = match service.latest_record(id).await {
                    Ok(Some(record)) => record.state == PowerState::On,
                    Ok(None) => false,
                    Err(e) => {
                        warn!(led_id = id.get(), error = %e, "Failed to fetch LED status");
                        false
                    }
                };
                (id, is_on)
            }
        });

        let results: Vec<(LedId, bool)> = join_all(futures).await;

        let mut leds = self.leds.write().await;
        for (id, is_on) in results {
            if let Some(led) = leds.iter_mut().find(|led| led.id == id) {
                *led = LedState::loaded(id, is_on);
            }
        }
        info!(count = known.len(), "Refreshed LED states");
        leds.clone()
    }

    /// Request the opposite of `current` and return the new state.
    ///
    /// On success the local flag is updated without re-reading. On failure
    /// local state is left untouched and [`Error::ToggleFailed`] is returned.
    pub async fn toggle(&self, id: LedId, current: bool) -> Result<bool> {
        let target = !current;
        if let Err(e) = self.service.set_state(id, target).await {
            warn!(led_id = id.get(), target, error = %e, "Failed to change LED state");
            return Err(Error::toggle_failed(id, e));
        }

        let mut leds = self.leds.write().await;
        if let Some(led) = leds.iter_mut().find(|led| led.id == id) {
            led.is_on = target;
        }
        info!(led_id = id.get(), on = target, "LED state changed");
        Ok(target)
    }

    /// Switch an LED to an explicit state.
    pub async fn set(&self, id: LedId, on: bool) -> Result<bool> {
        self.toggle(id, !on).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockLedService;
    use ledpanel_types::HistoryRecord;
    use std::time::Duration;

    fn id(n: u32) -> LedId {
        LedId::new(n).unwrap()
    }

    fn ids(ns: &[u32]) -> Vec<LedId> {
        ns.iter().map(|n| id(*n)).collect()
    }

    #[tokio::test]
    async fn test_new_creates_loading_placeholders() {
        let sync = StatusSync::new(Arc::new(MockLedService::new()), ids(&[2, 1, 2, 3]));
        let leds = sync.leds().await;
        assert_eq!(sync.ids().await, ids(&[2, 1, 3]));
        assert!(leds.iter().all(|led| led.is_loading && !led.is_on));
    }

    #[tokio::test]
    async fn test_refresh_uses_newest_record() {
        let mock = Arc::new(MockLedService::new());
        mock.set_history(
            id(1),
            vec![
                HistoryRecord::new("T2", PowerState::On),
                HistoryRecord::new("T1", PowerState::Off),
            ],
        )
        .await;
        mock.set_history(id(2), vec![HistoryRecord::new("T1", PowerState::Off)])
            .await;

        let sync = StatusSync::new(mock, ids(&[1, 2, 3]));
        let leds = sync.refresh_all().await;

        assert_eq!(leds[0], LedState::loaded(id(1), true));
        assert_eq!(leds[1], LedState::loaded(id(2), false));
        // No history at all
        assert_eq!(leds[2], LedState::loaded(id(3), false));
    }

    #[tokio::test]
    async fn test_refresh_settles_failed_ids() {
        let mock = Arc::new(MockLedService::new());
        mock.set_history(id(1), vec![HistoryRecord::new("T1", PowerState::On)])
            .await;
        mock.set_history(id(2), vec![HistoryRecord::new("T1", PowerState::On)])
            .await;
        mock.fail_reads_for(id(2)).await;

        let sync = StatusSync::new(mock, ids(&[1, 2]));
        let leds = sync.refresh_all().await;

        assert!(leds.iter().all(|led| !led.is_loading));
        assert!(leds[0].is_on);
        assert!(!leds[1].is_on);
    }

    #[tokio::test]
    async fn test_refresh_subset_leaves_others_loading() {
        let sync = StatusSync::new(Arc::new(MockLedService::new()), ids(&[1, 2]));
        let leds = sync.refresh(&ids(&[2, 9])).await;
        assert!(leds[0].is_loading);
        assert!(!leds[1].is_loading);
    }

    #[tokio::test]
    async fn test_refresh_queries_repeated_id_once() {
        let mock = Arc::new(MockLedService::new());
        mock.set_history(id(1), vec![HistoryRecord::new("T1", PowerState::On)])
            .await;
        let sync = StatusSync::new(Arc::clone(&mock), ids(&[1, 2]));

        let leds = sync.refresh(&ids(&[1, 1, 1])).await;
        assert_eq!(mock.read_count(), 1);
        assert_eq!(leds[0], LedState::loaded(id(1), true));
        assert!(leds[1].is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_is_refreshing_while_in_flight() {
        let mock = Arc::new(MockLedService::new());
        mock.set_latency(Duration::from_millis(200));
        let sync = Arc::new(StatusSync::new(mock, ids(&[1])));

        let task = tokio::spawn({
            let sync = Arc::clone(&sync);
            async move { sync.refresh_all().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(sync.is_refreshing());

        task.await.unwrap();
        assert!(!sync.is_refreshing());
    }

    #[tokio::test]
    async fn test_toggle_success_is_optimistic() {
        let mock = Arc::new(MockLedService::new());
        let sync = StatusSync::new(Arc::clone(&mock), ids(&[1]));
        sync.refresh_all().await;

        let new_state = sync.toggle(id(1), false).await.unwrap();
        assert!(new_state);
        assert!(sync.get(id(1)).await.unwrap().is_on);
        assert_eq!(mock.writes().await, vec![(id(1), true)]);

        assert!(!sync.toggle(id(1), true).await.unwrap());
        assert!(!sync.get(id(1)).await.unwrap().is_on);
    }

    #[tokio::test]
    async fn test_toggle_failure_keeps_state() {
        let mock = Arc::new(MockLedService::new());
        mock.set_history(id(1), vec![HistoryRecord::new("T1", PowerState::On)])
            .await;
        let sync = StatusSync::new(Arc::clone(&mock), ids(&[1]));
        sync.refresh_all().await;

        mock.set_fail_writes(true);
        let err = sync.toggle(id(1), true).await.unwrap_err();
        assert!(matches!(err, Error::ToggleFailed { .. }));
        assert!(sync.get(id(1)).await.unwrap().is_on);
    }

    #[tokio::test]
    async fn test_set_sends_explicit_state() {
        let mock = Arc::new(MockLedService::new());
        let sync = StatusSync::new(Arc::clone(&mock), ids(&[4]));
        assert!(sync.set(id(4), true).await.unwrap());
        assert!(!sync.set(id(4), false).await.unwrap());
        assert_eq!(mock.writes().await, vec![(id(4), true), (id(4), false)]);
    }

    #[tokio::test]
    async fn test_works_with_trait_objects() {
        let service: Arc<dyn LedService> = Arc::new(MockLedService::new());
        let sync = StatusSync::new(service, ids(&[1]));
        assert_eq!(sync.refresh_all().await.len(), 1);
    }
}
