//! Application state for the dashboard.
//!
//! [`App`] is the UI-side view of the panel. It never talks to the LED
//! service; it turns key presses into [`Command`]s and folds the worker's
//! [`PanelEvent`]s back into what is drawn.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tokio::sync::mpsc;

use ledpanel_core::{AggregateRequest, HistoryListing};
use ledpanel_types::{ChartKind, ChartSeries, LedId, LedState};

use super::messages::{Command, PanelEvent};
use super::ui::theme::AppTheme;
use crate::config::PanelConfig;

/// How long a status bar message stays visible.
const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(5);

/// Maximum number of queued status bar messages.
const MAX_STATUS_MESSAGES: usize = 5;

/// Braille spinner frames.
const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A failed toggle waiting to be acknowledged.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorPopup {
    /// Short message for the user.
    pub message: String,
    /// Underlying error text.
    pub details: String,
}

/// An LED's history shown in a popup.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPopup {
    pub id: LedId,
    /// `None` while the fetch is in flight.
    pub listing: Option<HistoryListing>,
}

/// Main application state for the dashboard.
pub struct App {
    should_quit: bool,
    /// LEDs in panel order.
    pub leds: Vec<LedState>,
    /// Index of the selected LED.
    pub selected: usize,
    /// Refreshes started but not yet finished.
    refreshes_in_flight: usize,
    /// LEDs with a toggle in flight.
    pending_toggles: HashSet<LedId>,
    spinner_frame: usize,
    /// Chart kinds enabled in the configuration.
    pub charts: Vec<ChartKind>,
    /// The chart currently shown, if any.
    pub chart: Option<ChartSeries>,
    /// The chart being loaded, if any.
    pub chart_loading: Option<ChartKind>,
    pub history: Option<HistoryPopup>,
    pub error: Option<ErrorPopup>,
    pub show_help: bool,
    status_messages: Vec<(String, Instant)>,
    /// Service the panel talks to, shown in the header.
    pub base_url: String,
    /// Local time of the last completed refresh.
    pub last_refresh: Option<DateTime<Local>>,
    no_color: bool,
    /// Receiver for worker events.
    pub event_rx: mpsc::Receiver<PanelEvent>,
}

impl App {
    /// Create the state for a configured panel. Every LED starts loading.
    pub fn new(config: &PanelConfig, event_rx: mpsc::Receiver<PanelEvent>) -> Self {
        Self {
            should_quit: false,
            leds: config
                .led_ids()
                .into_iter()
                .map(LedState::placeholder)
                .collect(),
            selected: 0,
            refreshes_in_flight: 0,
            pending_toggles: HashSet::new(),
            spinner_frame: 0,
            charts: config.charts.clone(),
            chart: None,
            chart_loading: None,
            history: None,
            error: None,
            show_help: false,
            status_messages: Vec::new(),
            base_url: config.base_url.clone(),
            last_refresh: None,
            no_color: config.no_color,
            event_rx,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Palette for the configured color setting.
    pub fn app_theme(&self) -> AppTheme {
        AppTheme::for_color(self.no_color)
    }

    /// The selected LED, if the panel has any.
    pub fn selected_led(&self) -> Option<&LedState> {
        self.leds.get(self.selected)
    }

    /// Select the next LED, wrapping around.
    pub fn select_next(&mut self) {
        if !self.leds.is_empty() {
            self.selected = (self.selected + 1) % self.leds.len();
        }
    }

    /// Select the previous LED, wrapping around.
    pub fn select_previous(&mut self) {
        if !self.leds.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.leds.len() - 1);
        }
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshes_in_flight > 0
    }

    /// Whether a toggle for `id` is waiting on the service.
    pub fn is_toggling(&self, id: LedId) -> bool {
        self.pending_toggles.contains(&id)
    }

    /// Whether the LED row should show a spinner.
    pub fn is_busy(&self, led: &LedState) -> bool {
        led.is_loading || self.is_toggling(led.id)
    }

    /// Advance the spinner animation.
    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner_char(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame]
    }

    /// Queue a status bar message, dropping the oldest beyond the limit.
    pub fn push_status_message(&mut self, message: impl Into<String>) {
        self.status_messages.push((message.into(), Instant::now()));
        if self.status_messages.len() > MAX_STATUS_MESSAGES {
            self.status_messages.remove(0);
        }
    }

    pub fn clean_expired_messages(&mut self) {
        self.status_messages
            .retain(|(_, at)| at.elapsed() < STATUS_MESSAGE_TIMEOUT);
    }

    /// The newest status message, if any.
    pub fn current_status_message(&self) -> Option<&str> {
        self.status_messages.last().map(|(msg, _)| msg.as_str())
    }

    pub fn has_popup(&self) -> bool {
        self.error.is_some() || self.history.is_some() || self.show_help
    }

    /// Close the topmost popup.
    pub fn dismiss(&mut self) {
        if self.error.is_some() {
            self.error = None;
        } else if self.history.is_some() {
            self.history = None;
        } else {
            self.show_help = false;
        }
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Build the refresh command. Rows show loading once the worker
    /// reports the refresh started.
    pub fn refresh_command(&self) -> Command {
        Command::RefreshAll
    }

    /// Build a toggle for the selected LED.
    ///
    /// Returns `None` while the LED is still loading or already switching,
    /// so the state sent as `current` is always one the service reported.
    pub fn toggle_command(&mut self) -> Option<Command> {
        let led = *self.selected_led()?;
        if self.is_busy(&led) {
            self.push_status_message(format!("{} is busy", led.id.label()));
            return None;
        }
        self.pending_toggles.insert(led.id);
        Some(Command::Toggle {
            id: led.id,
            current: led.is_on,
        })
    }

    /// Open the history popup for the selected LED.
    pub fn history_command(&mut self) -> Option<Command> {
        let id = self.selected_led()?.id;
        self.history = Some(HistoryPopup { id, listing: None });
        Some(Command::ShowHistory { id })
    }

    /// Build a chart load, per-LED kinds using the selected LED.
    pub fn chart_command(&mut self, kind: ChartKind) -> Option<Command> {
        if !self.charts.contains(&kind) {
            self.push_status_message(format!("Chart '{}' is disabled", kind.name()));
            return None;
        }
        let request = if kind.is_per_led() {
            AggregateRequest::new(kind, self.selected_led()?.id)
        } else {
            AggregateRequest::OnTimeTotals
        };
        self.chart_loading = Some(kind);
        Some(Command::LoadChart(request))
    }

    /// Undo the pending state a command builder set, for a command that
    /// never reached the worker.
    pub fn command_not_sent(&mut self, command: &Command) {
        match command {
            Command::Toggle { id, .. } => {
                self.pending_toggles.remove(id);
            }
            Command::ShowHistory { id } => {
                if self
                    .history
                    .as_ref()
                    .is_some_and(|p| p.id == *id && p.listing.is_none())
                {
                    self.history = None;
                }
            }
            Command::LoadChart(request) => {
                if self.chart_loading == Some(request.kind()) {
                    self.chart_loading = None;
                }
            }
            Command::RefreshAll | Command::Shutdown => {}
        }
    }

    /// Apply an event from the worker.
    pub fn handle_panel_event(&mut self, event: PanelEvent) {
        match event {
            PanelEvent::RefreshStarted => {
                self.refreshes_in_flight += 1;
                for led in &mut self.leds {
                    led.is_loading = true;
                }
            }
            PanelEvent::LedsUpdated(updated) => {
                self.refreshes_in_flight = self.refreshes_in_flight.saturating_sub(1);
                for state in updated {
                    if let Some(led) = self.leds.iter_mut().find(|l| l.id == state.id) {
                        *led = state;
                    }
                }
                self.last_refresh = Some(Local::now());
            }
            PanelEvent::Toggled { id, is_on } => {
                self.pending_toggles.remove(&id);
                if let Some(led) = self.leds.iter_mut().find(|l| l.id == id) {
                    *led = LedState::loaded(id, is_on);
                }
                let power = LedState::loaded(id, is_on).power();
                self.push_status_message(format!("{}: {}", id.label(), power.label()));
            }
            PanelEvent::ToggleFailed {
                id,
                message,
                details,
            } => {
                self.pending_toggles.remove(&id);
                tracing::warn!(led = %id, error = %details, "Toggle failed");
                self.error = Some(ErrorPopup { message, details });
            }
            PanelEvent::History { id, listing } => {
                // Ignore a late listing for a popup the user already closed
                if let Some(popup) = self.history.as_mut().filter(|p| p.id == id) {
                    popup.listing = Some(listing);
                }
            }
            PanelEvent::Chart(series) => match self.chart_loading {
                // A newer request for another kind supersedes this one
                Some(kind) if kind != series.kind => {
                    tracing::debug!(kind = series.kind.name(), "Dropping stale chart");
                }
                _ => {
                    self.chart_loading = None;
                    self.chart = Some(series);
                }
            },
        }
    }
}
