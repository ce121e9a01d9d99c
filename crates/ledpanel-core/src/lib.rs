//! Async client library for remotely controlled LED panels.
//!
//! This crate talks to an LED service over HTTP, keeps a local view of
//! which LEDs are on, and turns the service's history and statistics into
//! listings and chart series.
//!
//! # Features
//!
//! - **State sync**: concurrent refresh of every LED from its newest history record
//! - **Optimistic toggles**: flip local state on a successful write, report failures
//! - **History listings**: newest-first event logs with ready-to-display text
//! - **Aggregates**: on-hour totals, state timelines and session durations as chart series
//! - **Configurable endpoints**: paths, write method, body encoding, history order
//! - **Testing**: an in-memory [`MockLedService`] with failure injection
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use ledpanel_core::{ClientConfig, HistoryView, LedClient, StatusSync};
//! use ledpanel_types::LedId;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(LedClient::new(ClientConfig::new("http://localhost:3000"))?);
//!     let ids = [1, 2, 3].map(|n| LedId::new(n).unwrap());
//!
//!     let panel = StatusSync::new(Arc::clone(&client), ids);
//!     for led in panel.refresh_all().await {
//!         println!("LED {}: {}", led.id, led.power().label());
//!     }
//!
//!     let history = HistoryView::new(client);
//!     println!("{}", history.fetch_history(ids[0]).await);
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod history;
pub mod mock;
pub mod schema;
pub mod status;
pub mod traits;

// Re-export types crate
pub use ledpanel_types;

pub use client::LedClient;
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, Endpoints, HistoryOrder, StateEncoding, WriteMethod,
};
pub use error::{Error, ErrorKind, Result, TOGGLE_FAILED_MESSAGE};
pub use history::{
    AggregateRequest, EMPTY_HISTORY, HISTORY_FAILED, HistoryListing, HistoryView, NO_CHART_DATA,
};
pub use mock::{MockLedService, MockLedServiceBuilder};
pub use status::StatusSync;
pub use traits::LedService;
