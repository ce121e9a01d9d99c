//! Terminal dashboard for the LED panel.
//!
//! This module ties the dashboard together and owns the main event loop:
//!
//! - Terminal setup and restoration
//! - File logging, so tracing output never corrupts the screen
//! - Channel creation for worker communication
//! - Input handling and rendering
//! - Graceful shutdown coordination

pub mod app;
pub mod input;
pub mod messages;
pub mod ui;
pub mod worker;

pub use app::App;
pub use messages::{Command, PanelEvent};
pub use worker::PanelWorker;

use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    ExecutableCommand,
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use ledpanel_core::{LedClient, LedService};
use ledpanel_types::ChartKind;

use crate::config::PanelConfig;

/// Directory the dashboard writes its log file to.
pub fn default_log_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ledpanel")
}

/// Send tracing output to `<dir>/dashboard.log`.
///
/// Does nothing if a global subscriber is already installed.
fn init_file_logging(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("dashboard")
        .filename_suffix("log")
        .build(dir)
        .context("Failed to open dashboard log file")?;

    let _ = tracing_subscriber::fmt()
        .with_writer(appender)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Set up the terminal for TUI rendering.
///
/// Enables raw mode, mouse capture, and switches to the alternate screen buffer.
pub fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
///
/// Disables mouse capture, raw mode and returns to the main screen buffer.
pub fn restore_terminal() -> Result<()> {
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Run the dashboard.
///
/// This is the main entry point for the TUI. It:
/// 1. Builds the HTTP client from the configuration
/// 2. Spawns the background panel worker
/// 3. Requests the initial refresh and on-hours chart
/// 4. Runs the main event loop
/// 5. Ensures graceful shutdown
pub async fn run(config: PanelConfig) -> Result<()> {
    init_file_logging(&default_log_dir())?;
    info!(url = %config.base_url, leds = ?config.leds, "Starting dashboard");

    let client = LedClient::new(config.client_config())
        .with_context(|| format!("Failed to create client for {}", config.base_url))?;
    let service: Arc<dyn LedService> = Arc::new(client);

    // Create communication channels
    let (cmd_tx, cmd_rx) = mpsc::channel::<Command>(32);
    let (event_tx, event_rx) = mpsc::channel::<PanelEvent>(32);

    let worker = PanelWorker::new(cmd_rx, event_tx, service, config.led_ids());
    let worker_handle = tokio::spawn(worker.run());

    let mut app = App::new(&config, event_rx);

    let mut terminal = setup_terminal()?;

    // Every LED starts loading; populate the panel right away
    send_command(&mut app, &cmd_tx, Command::RefreshAll);
    if let Some(cmd) = config
        .chart_enabled(ChartKind::OnTimeTotals)
        .then(|| app.chart_command(ChartKind::OnTimeTotals))
        .flatten()
    {
        send_command(&mut app, &cmd_tx, cmd);
    }

    let result = run_event_loop(&mut terminal, &mut app, &cmd_tx).await;

    let _ = cmd_tx.try_send(Command::Shutdown);

    restore_terminal()?;

    let _ = worker_handle.await;
    info!("Dashboard closed");

    result
}

/// Queue a command for the worker.
///
/// When the queue is full the command is dropped and whatever pending state
/// building it set on `app` is undone.
fn send_command(app: &mut App, command_tx: &mpsc::Sender<Command>, cmd: Command) {
    if let Err(e) = command_tx.try_send(cmd) {
        app.command_not_sent(&e.into_inner());
        app.push_status_message("Worker is busy, try again");
    }
}

/// Main event loop for the TUI.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    command_tx: &mpsc::Sender<Command>,
) -> Result<()> {
    while !app.should_quit() {
        app.tick_spinner();
        app.clean_expired_messages();

        terminal.draw(|f| ui::draw(f, app))?;

        // Poll for keyboard and mouse events with timeout
        if event::poll(Duration::from_millis(100))? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(key.code, app.has_popup())
                }
                Event::Mouse(mouse_event) => input::handle_mouse(mouse_event),
                _ => input::Action::None,
            };
            if let Some(cmd) = input::apply_action(app, action) {
                send_command(app, command_tx, cmd);
            }
        }

        // Non-blocking receive of worker events
        while let Ok(event) = app.event_rx.try_recv() {
            app.handle_panel_event(event);
        }

        tokio::task::yield_now().await;
    }

    Ok(())
}
