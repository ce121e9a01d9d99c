//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use ledpanel_cli::config::PanelConfig;
use ledpanel_types::{ChartKind, LedId, PowerState};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

/// Visual styling mode for output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StyleMode {
    /// Standard styling with colors
    Minimal,
    /// Rich styling with tables and full formatting (default)
    #[default]
    Rich,
    /// Plain text with no decorations (for scripting)
    Plain,
}

/// Reusable output format arguments
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format (defaults to the config file's `format`, then text)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Omit header row in CSV output (useful for appending)
    #[arg(long)]
    pub no_header: bool,
}

impl OutputArgs {
    /// Resolve the format: `--json`, then `--format`, then config, then text.
    pub fn resolve(&self, json: bool, config: &PanelConfig) -> OutputFormat {
        if json {
            return OutputFormat::Json;
        }
        self.format
            .or_else(|| {
                config
                    .format
                    .as_deref()
                    .and_then(|s| OutputFormat::from_str(s, true).ok())
            })
            .unwrap_or_default()
    }
}

#[derive(Parser)]
#[command(name = "ledpanel")]
#[command(author, version, about = "Control and inspect remotely switched LEDs", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output compact JSON (no pretty-printing)
    #[arg(long, global = true)]
    pub compact: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Visual styling mode (minimal, rich, plain)
    #[arg(
        long,
        global = true,
        value_enum,
        default_value = "rich",
        env = "LEDPANEL_STYLE"
    )]
    pub style: StyleMode,

    /// Write output to file instead of stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(short, long, global = true, env = "LEDPANEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the LED service (overrides the config file)
    #[arg(short, long, global = true, env = "LEDPANEL_URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Refresh and show the state of every LED
    Status {
        /// Only these LEDs - can be specified multiple times, or comma-separated
        #[arg(short, long, value_delimiter = ',', value_parser = parse_led_id)]
        led: Vec<LedId>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Flip an LED to the opposite state
    Toggle {
        /// LED identifier
        #[arg(value_parser = parse_led_id)]
        id: LedId,

        /// State the LED is known to be in (refreshed from the service when omitted)
        #[arg(long, value_parser = parse_power_state)]
        current: Option<PowerState>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Switch an LED on or off
    Set {
        /// LED identifier
        #[arg(value_parser = parse_led_id)]
        id: LedId,

        /// Target state (on/off)
        #[arg(value_parser = parse_power_state)]
        state: PowerState,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show an LED's event history, newest first
    History {
        /// LED identifier
        #[arg(value_parser = parse_led_id)]
        id: LedId,

        /// Number of events to show (0 = all)
        #[arg(short = 'n', long, default_value = "0")]
        count: usize,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Show an aggregate chart
    Chart {
        /// Chart kind (bar, line, duration)
        #[arg(value_parser = parse_chart_kind)]
        kind: ChartKind,

        /// LED for per-LED charts (defaults to the first configured LED)
        #[arg(short, long, value_parser = parse_led_id)]
        led: Option<LedId>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// List an LED's on-sessions and their durations
    Sessions {
        /// LED identifier
        #[arg(value_parser = parse_led_id)]
        id: LedId,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },

    /// Launch the interactive dashboard
    #[cfg(feature = "tui")]
    Tui,
}

/// Configuration subcommands
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,

    /// Show configuration file path
    Path,

    /// Initialize default configuration
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Parse an LED identifier
fn parse_led_id(s: &str) -> Result<LedId, String> {
    s.parse::<LedId>()
        .map_err(|_| format!("'{}' is not a valid LED id (expected a number from 1)", s))
}

/// Parse a power state with flexible input
fn parse_power_state(s: &str) -> Result<PowerState, String> {
    s.parse::<PowerState>()
        .map_err(|_| format!("Invalid state '{}'. Use: on/off, 1/0, true/false", s))
}

/// Parse a chart kind
fn parse_chart_kind(s: &str) -> Result<ChartKind, String> {
    s.parse::<ChartKind>().map_err(|e| e.to_string())
}
