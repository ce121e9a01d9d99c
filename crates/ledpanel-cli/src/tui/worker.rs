//! Background worker for LED service requests.
//!
//! [`PanelWorker`] owns the [`StatusSync`] and [`HistoryView`] for the
//! dashboard and runs every request off the UI thread:
//!
//! - Receives [`Command`]s from the UI
//! - Sends [`PanelEvent`]s back with results
//!
//! Each command runs in its own task so a slow history fetch never delays a
//! toggle. Overlapping refreshes are allowed; each one settles every LED.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use ledpanel_core::{HistoryView, LedService, StatusSync};
use ledpanel_types::LedId;

use super::messages::{Command, PanelEvent};

/// Background worker that talks to the LED service.
pub struct PanelWorker {
    /// Receiver for commands from the UI thread.
    command_rx: mpsc::Receiver<Command>,
    /// Sender for events back to the UI thread.
    event_tx: mpsc::Sender<PanelEvent>,
    sync: Arc<StatusSync<dyn LedService>>,
    history: HistoryView<dyn LedService>,
}

impl PanelWorker {
    /// Create a worker for a panel of LEDs.
    pub fn new(
        command_rx: mpsc::Receiver<Command>,
        event_tx: mpsc::Sender<PanelEvent>,
        service: Arc<dyn LedService>,
        ids: Vec<LedId>,
    ) -> Self {
        Self {
            command_rx,
            event_tx,
            sync: Arc::new(StatusSync::new(Arc::clone(&service), ids)),
            history: HistoryView::new(service),
        }
    }

    /// Run the worker's main loop.
    ///
    /// This method consumes the worker and runs until a [`Command::Shutdown`]
    /// is received or the command channel is closed. In-flight requests are
    /// aborted on exit.
    pub async fn run(mut self) {
        info!("PanelWorker started");
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(Command::Shutdown) => {
                            info!("PanelWorker received shutdown command");
                            break;
                        }
                        Some(cmd) => {
                            debug!(?cmd, "Handling command");
                            tasks.spawn(self.handle_command(cmd));
                        }
                        None => {
                            info!("Command channel closed, shutting down worker");
                            break;
                        }
                    }
                }
                Some(result) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = result {
                        warn!(error = %e, "Worker task failed");
                    }
                }
            }
        }

        tasks.abort_all();
        info!("PanelWorker stopped");
    }

    /// Build the task for a single command.
    fn handle_command(&self, cmd: Command) -> impl Future<Output = ()> + Send + 'static {
        let sync = Arc::clone(&self.sync);
        let history = self.history.clone();
        let event_tx = self.event_tx.clone();

        async move {
            let event = match cmd {
                Command::RefreshAll => {
                    let _ = event_tx.send(PanelEvent::RefreshStarted).await;
                    PanelEvent::LedsUpdated(sync.refresh_all().await)
                }
                Command::Toggle { id, current } => match sync.toggle(id, current).await {
                    Ok(is_on) => PanelEvent::Toggled { id, is_on },
                    Err(e) => PanelEvent::ToggleFailed {
                        id,
                        message: e.user_message(),
                        details: e.to_string(),
                    },
                },
                Command::ShowHistory { id } => PanelEvent::History {
                    id,
                    listing: history.fetch_history(id).await,
                },
                Command::LoadChart(request) => {
                    PanelEvent::Chart(history.fetch_aggregate(request).await)
                }
                Command::Shutdown => return,
            };

            if event_tx.send(event).await.is_err() {
                debug!("UI closed before event was delivered");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledpanel_core::{AggregateRequest, HistoryListing, MockLedServiceBuilder};
    use ledpanel_types::PowerState;

    fn id(n: u32) -> LedId {
        LedId::new(n).unwrap()
    }

    fn spawn_worker(
        service: Arc<dyn LedService>,
        ids: Vec<LedId>,
    ) -> (
        mpsc::Sender<Command>,
        mpsc::Receiver<PanelEvent>,
        tokio::task::JoinHandle<()>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        let (event_tx, event_rx) = mpsc::channel(8);
        let worker = PanelWorker::new(cmd_rx, event_tx, service, ids);
        (cmd_tx, event_rx, tokio::spawn(worker.run()))
    }

    #[tokio::test]
    async fn test_refresh_reports_every_led() {
        let service = Arc::new(
            MockLedServiceBuilder::new()
                .led(id(1), PowerState::On)
                .build(),
        );
        let (cmd_tx, mut event_rx, handle) = spawn_worker(service, vec![id(1), id(2)]);

        cmd_tx.send(Command::RefreshAll).await.unwrap();
        assert_eq!(event_rx.recv().await, Some(PanelEvent::RefreshStarted));
        match event_rx.recv().await {
            Some(PanelEvent::LedsUpdated(leds)) => {
                assert_eq!(leds.len(), 2);
                assert!(leds[0].is_on);
                assert!(!leds[1].is_on);
            }
            other => panic!("unexpected event: {other:?}"),
        }

        cmd_tx.send(Command::Shutdown).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_toggle_failure_event() {
        let service = Arc::new(MockLedServiceBuilder::new().fail_writes(true).build());
        let (cmd_tx, mut event_rx, _handle) = spawn_worker(service, vec![id(1)]);

        cmd_tx
            .send(Command::Toggle {
                id: id(1),
                current: false,
            })
            .await
            .unwrap();
        match event_rx.recv().await {
            Some(PanelEvent::ToggleFailed { id: failed, message, .. }) => {
                assert_eq!(failed, id(1));
                assert_eq!(message, "No se pudo cambiar el estado del LED.");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_history_and_chart_events() {
        let service = Arc::new(MockLedServiceBuilder::new().build());
        let (cmd_tx, mut event_rx, _handle) = spawn_worker(service, vec![id(1)]);

        cmd_tx
            .send(Command::ShowHistory { id: id(1) })
            .await
            .unwrap();
        assert_eq!(
            event_rx.recv().await,
            Some(PanelEvent::History {
                id: id(1),
                listing: HistoryListing::Empty,
            })
        );

        cmd_tx
            .send(Command::LoadChart(AggregateRequest::OnTimeTotals))
            .await
            .unwrap();
        match event_rx.recv().await {
            Some(PanelEvent::Chart(series)) => assert!(series.is_empty()),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_worker_stops_when_channel_closes() {
        let service = Arc::new(MockLedServiceBuilder::new().build());
        let (cmd_tx, _event_rx, handle) = spawn_worker(service, vec![id(1)]);
        drop(cmd_tx);
        handle.await.unwrap();
    }
}
