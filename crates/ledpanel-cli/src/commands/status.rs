//! Status command implementation.

use anyhow::Result;
use tracing::debug;

use ledpanel_core::StatusSync;
use ledpanel_types::LedId;

use super::CommandContext;
use crate::cli::OutputFormat;
use crate::format::{format_status_csv, format_status_json, format_status_text};
use crate::style;
use crate::util::{build_client, write_output};

/// Refresh every requested LED and print the panel.
///
/// LEDs whose history could not be read are shown as off; the failure is
/// logged, not returned.
pub async fn cmd_status(ctx: &CommandContext<'_>, leds: Vec<LedId>) -> Result<()> {
    let ids = if leds.is_empty() {
        ctx.config.led_ids()
    } else {
        leds
    };
    let count = ids.len();
    debug!(count, url = %ctx.config.base_url, "Refreshing panel");

    let client = build_client(ctx.config)?;
    let sync = StatusSync::new(client, ids);

    let spinner = ctx.show_progress().then(|| style::refresh_spinner(count));
    let states = sync.refresh_all().await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let content = match ctx.format {
        OutputFormat::Json => format_status_json(&states, &ctx.opts)?,
        OutputFormat::Csv => format_status_csv(&states, &ctx.opts),
        OutputFormat::Text => format_status_text(&states, &ctx.opts),
    };

    write_output(ctx.output, &content)?;
    Ok(())
}
