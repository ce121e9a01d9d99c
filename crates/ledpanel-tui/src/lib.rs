//! Terminal dashboard for LED panels.
//!
//! This crate provides a standalone binary wrapper around ledpanel-cli's
//! dashboard. The implementation lives in `ledpanel-cli` with the `tui`
//! feature enabled.
//!
//! For the dashboard implementation, see [`ledpanel_cli::tui`].

pub use ledpanel_cli::tui;
