mod cli;
mod commands;
mod format;
mod style;
mod util;

use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use ledpanel_cli::config::PanelConfig;

use cli::{Cli, Commands, OutputArgs};
use commands::{
    CommandContext, ConfigArgs, cmd_chart, cmd_config, cmd_history, cmd_sessions, cmd_set,
    cmd_status, cmd_toggle,
};
use format::FormatOptions;

#[tokio::main]
async fn main() -> Result<()> {
    human_panic::setup_panic!();

    let Cli {
        verbose,
        quiet,
        json,
        compact,
        no_color,
        style,
        output,
        config: config_path,
        url,
        command,
    } = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "ledpanel", &mut io::stdout());
        return Ok(());
    }

    // The dashboard owns the terminal and logs to a file instead
    #[cfg(feature = "tui")]
    let log_to_stderr = !matches!(command, Commands::Tui);
    #[cfg(not(feature = "tui"))]
    let log_to_stderr = true;

    if log_to_stderr {
        // When quiet mode is enabled, suppress info-level logging
        let filter = if quiet {
            EnvFilter::new("warn")
        } else if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    let base_opts = FormatOptions::new(no_color, style).with_compact(compact);

    if let Commands::Config { action } = command {
        return cmd_config(ConfigArgs {
            action,
            path: config_path.as_deref(),
            url: url.as_deref(),
            json,
            output: output.as_ref(),
            opts: &base_opts,
        });
    }

    let config = PanelConfig::resolve(config_path.as_deref(), url.as_deref())
        .context("Failed to load configuration")?;
    tracing::debug!(url = %config.base_url, leds = ?config.leds, "Configuration resolved");

    let opts = if config.no_color {
        FormatOptions {
            no_color: true,
            ..base_opts
        }
    } else {
        base_opts
    };
    let context = |args: &OutputArgs| CommandContext {
        config: &config,
        format: args.resolve(json, &config),
        output: output.as_ref(),
        quiet,
        opts: opts.with_no_header(args.no_header),
    };

    match command {
        Commands::Status { led, output: args } => cmd_status(&context(&args), led).await,
        Commands::Toggle {
            id,
            current,
            output: args,
        } => cmd_toggle(&context(&args), id, current).await,
        Commands::Set {
            id,
            state,
            output: args,
        } => cmd_set(&context(&args), id, state).await,
        Commands::History {
            id,
            count,
            output: args,
        } => cmd_history(&context(&args), id, count).await,
        Commands::Chart {
            kind,
            led,
            output: args,
        } => cmd_chart(&context(&args), kind, led).await,
        Commands::Sessions { id, output: args } => cmd_sessions(&context(&args), id).await,
        #[cfg(feature = "tui")]
        Commands::Tui => ledpanel_cli::tui::run(config.clone()).await,
        // Handled before configuration is resolved
        Commands::Completions { .. } | Commands::Config { .. } => Ok(()),
    }
}
