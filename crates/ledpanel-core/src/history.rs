//! History listings and aggregate chart series for individual LEDs.
//!
//! [`HistoryView`] never fails: read errors are logged and turned into a
//! [`HistoryListing::Failed`] listing or an empty [`ChartSeries`], so a
//! front-end can always render something. The `fetch_records` and
//! `fetch_sessions` variants return typed rows and propagate errors for
//! callers that need them (machine-readable output).

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use ledpanel_types::{ChartKind, ChartSeries, HistoryRecord, LedId, SessionReport};

use crate::error::Result;
use crate::traits::LedService;

/// Text shown for an LED without history.
pub const EMPTY_HISTORY: &str = "Sin eventos.";
/// Text shown when the history could not be fetched.
pub const HISTORY_FAILED: &str = "No se pudo obtener el historial.";
/// Text shown for a chart without points.
pub const NO_CHART_DATA: &str = "No hay datos para mostrar.";

/// Outcome of a history fetch, ready to display.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryListing {
    /// The LED has no recorded events.
    Empty,
    /// Events, newest first.
    Events(Vec<HistoryRecord>),
    /// The fetch failed; carries the underlying error text.
    Failed(String),
}

impl HistoryListing {
    /// Popup title for an LED's history.
    pub fn title(id: LedId) -> String {
        format!("Historial LED {}", id)
    }

    /// Build a listing from fetched records.
    pub fn from_records(records: Vec<HistoryRecord>) -> Self {
        if records.is_empty() {
            Self::Empty
        } else {
            Self::Events(records)
        }
    }

    /// Display lines, one per event.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Empty => vec![EMPTY_HISTORY.to_string()],
            Self::Events(records) => records.iter().map(HistoryRecord::summary_line).collect(),
            Self::Failed(_) => vec![HISTORY_FAILED.to_string()],
        }
    }

    /// Listing body with lines joined by `\n`.
    pub fn render(&self) -> String {
        self.lines().join("\n")
    }

    /// Whether the fetch failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Keep only the newest `count` events.
    pub fn truncate(&mut self, count: usize) {
        if let Self::Events(records) = self {
            records.truncate(count);
        }
    }
}

impl fmt::Display for HistoryListing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Which aggregate to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateRequest {
    /// On-hours for every LED.
    OnTimeTotals,
    /// 0/1 timeline for one LED.
    StateTimeline(LedId),
    /// Session durations for one LED.
    SessionDurations(LedId),
}

impl AggregateRequest {
    /// Request a chart kind; `led` is ignored for the all-LED totals.
    pub fn new(kind: ChartKind, led: LedId) -> Self {
        match kind {
            ChartKind::OnTimeTotals => Self::OnTimeTotals,
            ChartKind::StateTimeline => Self::StateTimeline(led),
            ChartKind::SessionDurations => Self::SessionDurations(led),
        }
    }

    /// Chart kind produced by this request.
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::OnTimeTotals => ChartKind::OnTimeTotals,
            Self::StateTimeline(_) => ChartKind::StateTimeline,
            Self::SessionDurations(_) => ChartKind::SessionDurations,
        }
    }

    /// LED the request is scoped to, if any.
    pub fn led(&self) -> Option<LedId> {
        match self {
            Self::OnTimeTotals => None,
            Self::StateTimeline(id) | Self::SessionDurations(id) => Some(*id),
        }
    }
}

/// On-demand history and statistics for LEDs.
pub struct HistoryView<S: LedService + ?Sized> {
    service: Arc<S>,
}

impl<S: LedService + ?Sized> Clone for HistoryView<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<S: LedService + ?Sized> fmt::Debug for HistoryView<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryView").finish_non_exhaustive()
    }
}

impl<S: LedService + ?Sized> HistoryView<S> {
    /// Create a view over a service.
    pub fn new(service: Arc<S>) -> Self {
        Self { service }
    }

    /// Fetch an LED's history as a display listing.
    pub async fn fetch_history(&self, id: LedId) -> HistoryListing {
        match self.service.history(id).await {
            Ok(records) => {
                debug!(led_id = id.get(), count = records.len(), "History loaded");
                HistoryListing::from_records(records)
            }
            Err(e) => {
                warn!(led_id = id.get(), error = %e, "Failed to fetch history");
                HistoryListing::Failed(e.to_string())
            }
        }
    }

    /// Fetch an LED's history as typed records, newest first.
    pub async fn fetch_records(&self, id: LedId) -> Result<Vec<HistoryRecord>> {
        self.service.history(id).await
    }

    /// Fetch per-session reports for an LED.
    pub async fn fetch_sessions(&self, id: LedId) -> Result<Vec<SessionReport>> {
        self.service.session_reports(id).await
    }

    /// Fetch an aggregate and project it onto a chart series.
    ///
    /// Any failure yields an empty series of the requested kind.
    pub async fn fetch_aggregate(&self, request: AggregateRequest) -> ChartSeries {
        let result = match request {
            AggregateRequest::OnTimeTotals => self
                .service
                .time_totals()
                .await
                .map(|rows| ChartSeries::on_time_totals(&rows)),
            AggregateRequest::StateTimeline(id) => self
                .service
                .state_samples(id)
                .await
                .map(|samples| ChartSeries::state_timeline(id, &samples)),
            AggregateRequest::SessionDurations(id) => self
                .service
                .session_reports(id)
                .await
                .map(|reports| ChartSeries::session_durations(id, &reports)),
        };

        match result {
            Ok(series) => series,
            Err(e) => {
                warn!(chart = %request.kind(), led_id = ?request.led().map(LedId::get), error = %e, "Failed to fetch aggregate");
                ChartSeries::empty(
                    request.kind(),
                    ChartSeries::title_for(request.kind(), request.led()),
                )
            }
        }
    }
}
