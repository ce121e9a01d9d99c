//! Sessions command implementation.

use anyhow::Result;
use tracing::warn;

use ledpanel_core::HistoryView;
use ledpanel_types::LedId;

use super::CommandContext;
use crate::cli::OutputFormat;
use crate::format::{format_sessions_csv, format_sessions_json, format_sessions_text};
use crate::style;
use crate::util::{build_client, write_output};

pub async fn cmd_sessions(ctx: &CommandContext<'_>, id: LedId) -> Result<()> {
    let view = HistoryView::new(build_client(ctx.config)?);

    let spinner = style::maybe_spinner(ctx.show_progress(), "Loading sessions...");
    let reports = view.fetch_sessions(id).await.unwrap_or_else(|e| {
        warn!(led_id = id.get(), error = %e, "Failed to fetch session reports");
        Vec::new()
    });
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let content = match ctx.format {
        OutputFormat::Json => format_sessions_json(&reports, &ctx.opts)?,
        OutputFormat::Csv => format_sessions_csv(&reports, &ctx.opts),
        OutputFormat::Text => format_sessions_text(id, &reports, &ctx.opts),
    };

    write_output(ctx.output, &content)?;
    Ok(())
}
