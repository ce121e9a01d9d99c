//! History command implementation.

use anyhow::Result;
use tracing::warn;

use ledpanel_core::HistoryView;
use ledpanel_types::LedId;

use super::CommandContext;
use crate::cli::OutputFormat;
use crate::format::{format_history_csv, format_history_json, format_history_text};
use crate::style;
use crate::util::{build_client, write_output};

/// Print an LED's history, newest first.
///
/// `count` limits the output to the newest events; 0 shows everything.
/// A failed fetch prints the failure listing (text) or an empty set of
/// records (JSON/CSV) after logging the error.
pub async fn cmd_history(ctx: &CommandContext<'_>, id: LedId, count: usize) -> Result<()> {
    let view = HistoryView::new(build_client(ctx.config)?);

    let spinner = style::maybe_spinner(ctx.show_progress(), "Loading history...");
    let content = match ctx.format {
        OutputFormat::Text => {
            let mut listing = view.fetch_history(id).await;
            if count > 0 {
                listing.truncate(count);
            }
            format_history_text(id, &listing, &ctx.opts)
        }
        format => {
            let mut records = view.fetch_records(id).await.unwrap_or_else(|e| {
                warn!(led_id = id.get(), error = %e, "Failed to fetch history");
                Vec::new()
            });
            if count > 0 {
                records.truncate(count);
            }
            if format == OutputFormat::Json {
                format_history_json(&records, &ctx.opts)?
            } else {
                format_history_csv(&records, &ctx.opts)
            }
        }
    };
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    write_output(ctx.output, &content)?;
    Ok(())
}
