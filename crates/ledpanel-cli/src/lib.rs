//! Command-line interface and terminal dashboard for remotely controlled LED panels.
//!
//! This crate provides the `ledpanel` binary, which talks to an LED service
//! over HTTP through [`ledpanel_core`].
//!
//! # Features
//!
//! - **Panel status**: refresh and print the on/off state of every LED
//! - **Switching**: toggle an LED or set it explicitly
//! - **History**: newest-first event listings per LED
//! - **Charts**: on-hour totals, state timelines and session durations
//! - **Multiple output formats**: Text, JSON, and CSV output support
//! - **Configuration file**: one file describes the whole panel
//! - **Dashboard**: an interactive terminal UI (feature `tui`)
//! - **Shell completions**: Generate completions for bash, zsh, fish, and PowerShell
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `status` | Refresh and print every LED |
//! | `toggle` | Flip one LED |
//! | `set` | Switch one LED on or off |
//! | `history` | Show an LED's event log |
//! | `chart` | Print an aggregate chart |
//! | `sessions` | List per-session durations |
//! | `config` | Manage the configuration file |
//! | `completions` | Generate shell completions |
//! | `tui` | Launch the dashboard |
//!
//! # Configuration
//!
//! The panel is described by `~/.config/ledpanel/config.toml` (or platform
//! equivalent):
//!
//! ```toml
//! base_url = "http://localhost:3000"
//! leds = [1, 2, 3]
//! charts = ["bar", "line", "duration"]
//! write_method = "put"       # or "post"
//! state_encoding = "bool"    # or "int"
//! history_order = "newest_first"
//!
//! [endpoints]
//! history = "/historial"
//! write = "/led/{id}"
//! ```
//!
//! # Environment Variables
//!
//! - `LEDPANEL_URL`: Base URL of the LED service (overridden by `--url`)
//! - `LEDPANEL_CONFIG`: Path of the configuration file
//! - `NO_COLOR`: Disable colored output when set
//!
//! # Examples
//!
//! ```bash
//! ledpanel status
//! ledpanel toggle 2
//! ledpanel history 1 --count 10 --format csv --output led1.csv
//! ledpanel chart bar
//! ```

// Re-export core dependencies for convenience
pub use ledpanel_core;
pub use ledpanel_types;

pub mod config;

// TUI module - publicly exposed for ledpanel-tui crate to use
#[cfg(feature = "tui")]
pub mod tui;
