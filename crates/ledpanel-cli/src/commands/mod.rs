//! Command implementations for the CLI.

use std::path::PathBuf;

use ledpanel_cli::config::PanelConfig;

use crate::cli::OutputFormat;
use crate::format::FormatOptions;

mod chart;
mod config;
mod history;
mod sessions;
mod set;
mod status;
mod toggle;

pub use chart::cmd_chart;
pub use config::{ConfigArgs, cmd_config};
pub use history::cmd_history;
pub use sessions::cmd_sessions;
pub use set::cmd_set;
pub use status::cmd_status;
pub use toggle::cmd_toggle;

/// Settings shared by every command that talks to the LED service.
pub struct CommandContext<'a> {
    pub config: &'a PanelConfig,
    pub format: OutputFormat,
    pub output: Option<&'a PathBuf>,
    pub quiet: bool,
    pub opts: FormatOptions,
}

impl CommandContext<'_> {
    /// Whether to show spinners: interactive text output only.
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text && self.output.is_none()
    }
}
