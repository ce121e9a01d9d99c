//! Mock LED service for testing.
//!
//! [`MockLedService`] implements [`LedService`] in memory so panels can be
//! exercised without a running HTTP service.
//!
//! # Features
//!
//! - **Failure injection**: fail reads for specific LEDs, all aggregate reads, or writes
//! - **Latency simulation**: delay every operation to observe in-flight state
//! - **Write log**: inspect every state write the panel issued

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use ledpanel_types::{
    HistoryRecord, LedId, PowerState, SessionReport, StateSample, TimeTotal, Timestamp,
};

use crate::error::{Error, Result};
use crate::traits::LedService;

/// An in-memory LED service.
///
/// A successful write prepends a record to the LED's history, so a later
/// refresh observes it the way the real service would.
///
/// # Example
///
/// ```
/// use ledpanel_core::{LedService, MockLedService};
/// use ledpanel_types::LedId;
///
/// #[tokio::main]
/// async fn main() {
///     let service = MockLedService::new();
///     let id = LedId::new(1).unwrap();
///     service.set_state(id, true).await.unwrap();
///     let latest = service.latest_record(id).await.unwrap().unwrap();
///     assert!(latest.state.is_on());
/// }
/// ```
#[derive(Debug, Default)]
pub struct MockLedService {
    history: RwLock<HashMap<LedId, Vec<HistoryRecord>>>,
    time_totals: RwLock<Vec<TimeTotal>>,
    samples: RwLock<HashMap<LedId, Vec<StateSample>>>,
    reports: RwLock<HashMap<LedId, Vec<SessionReport>>>,
    failing_reads: RwLock<HashSet<LedId>>,
    fail_aggregates: AtomicBool,
    fail_writes: AtomicBool,
    /// Simulated latency in milliseconds (0 = no delay).
    latency_ms: AtomicU64,
    read_count: AtomicU32,
    writes: RwLock<Vec<(LedId, bool)>>,
}

impl MockLedService {
    /// Create an empty service: every LED has no history.
    pub fn new() -> Self {
        Self::default()
    }

    fn failure(operation: &str) -> Error {
        Error::Status {
            url: format!("mock://{}", operation),
            status: 503,
            message: "Mock failure".to_string(),
        }
    }

    async fn simulate_latency(&self) {
        let ms = self.latency_ms.load(Ordering::Relaxed);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    /// Replace an LED's history (newest first).
    pub async fn set_history(&self, id: LedId, records: Vec<HistoryRecord>) {
        self.history.write().await.insert(id, records);
    }

    /// Replace the hour totals.
    pub async fn set_time_totals(&self, rows: Vec<TimeTotal>) {
        *self.time_totals.write().await = rows;
    }

    /// Replace an LED's state samples.
    pub async fn set_state_samples(&self, id: LedId, samples: Vec<StateSample>) {
        self.samples.write().await.insert(id, samples);
    }

    /// Replace an LED's session reports.
    pub async fn set_session_reports(&self, id: LedId, reports: Vec<SessionReport>) {
        self.reports.write().await.insert(id, reports);
    }

    /// Make history reads for one LED fail.
    pub async fn fail_reads_for(&self, id: LedId) {
        self.failing_reads.write().await.insert(id);
    }

    /// Make every aggregate read fail.
    pub fn set_fail_aggregates(&self, fail: bool) {
        self.fail_aggregates.store(fail, Ordering::Relaxed);
    }

    /// Make every write fail.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    /// Set simulated latency for every operation.
    ///
    /// Set to `Duration::ZERO` to disable latency simulation.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::Relaxed);
    }

    /// Number of read operations performed.
    pub fn read_count(&self) -> u32 {
        self.read_count.load(Ordering::Relaxed)
    }

    /// Every successful write, in order.
    pub async fn writes(&self) -> Vec<(LedId, bool)> {
        self.writes.read().await.clone()
    }

    async fn aggregate_read(&self, operation: &str) -> Result<()> {
        self.simulate_latency().await;
        self.read_count.fetch_add(1, Ordering::Relaxed);
        if self.fail_aggregates.load(Ordering::Relaxed) {
            return Err(Self::failure(operation));
        }
        Ok(())
    }
}

#[async_trait]
impl LedService for MockLedService {
    async fn history(&self, id: LedId) -> Result<Vec<HistoryRecord>> {
        self.simulate_latency().await;
        self.read_count.fetch_add(1, Ordering::Relaxed);
        if self.failing_reads.read().await.contains(&id) {
            return Err(Self::failure("historial"));
        }
        Ok(self
            .history
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn set_state(&self, id: LedId, on: bool) -> Result<()> {
        self.simulate_latency().await;
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(Self::failure("led"));
        }

        let record = HistoryRecord {
            timestamp: Timestamp::from_datetime(OffsetDateTime::now_utc()),
            state: PowerState::from(on),
            duration_seconds: None,
            range_start: None,
            range_end: None,
        };
        self.history
            .write()
            .await
            .entry(id)
            .or_default()
            .insert(0, record);
        self.writes.write().await.push((id, on));
        Ok(())
    }

    async fn time_totals(&self) -> Result<Vec<TimeTotal>> {
        self.aggregate_read("estadisticas/tiempos").await?;
        Ok(self.time_totals.read().await.clone())
    }

    async fn state_samples(&self, id: LedId) -> Result<Vec<StateSample>> {
        self.aggregate_read("estadisticas/linea").await?;
        Ok(self
            .samples
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    async fn session_reports(&self, id: LedId) -> Result<Vec<SessionReport>> {
        self.aggregate_read("reportes").await?;
        Ok(self
            .reports
            .read()
            .await
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }
}

/// Builder for [`MockLedService`] with preset data.
#[derive(Debug, Default)]
pub struct MockLedServiceBuilder {
    history: HashMap<LedId, Vec<HistoryRecord>>,
    time_totals: Vec<TimeTotal>,
    fail_writes: bool,
    latency: Duration,
}

impl MockLedServiceBuilder {
    /// Create a builder with an empty service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Give an LED a single history record in `state`.
    pub fn led(mut self, id: LedId, state: PowerState) -> Self {
        let record = HistoryRecord::new("2024-01-01T00:00:00Z", state);
        self.history.insert(id, vec![record]);
        self
    }

    /// Set an LED's full history (newest first).
    pub fn history(mut self, id: LedId, records: Vec<HistoryRecord>) -> Self {
        self.history.insert(id, records);
        self
    }

    /// Set the hour totals.
    pub fn time_totals(mut self, rows: Vec<TimeTotal>) -> Self {
        self.time_totals = rows;
        self
    }

    /// Make every write fail.
    pub fn fail_writes(mut self, fail: bool) -> Self {
        self.fail_writes = fail;
        self
    }

    /// Simulated latency for every operation.
    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Build the service.
    pub fn build(self) -> MockLedService {
        MockLedService {
            history: RwLock::new(self.history),
            time_totals: RwLock::new(self.time_totals),
            fail_writes: AtomicBool::new(self.fail_writes),
            latency_ms: AtomicU64::new(self.latency.as_millis() as u64),
            ..MockLedService::default()
        }
    }
}
