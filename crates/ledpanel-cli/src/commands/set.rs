//! Set command implementation.

use anyhow::Result;

use ledpanel_core::StatusSync;
use ledpanel_types::{LedId, PowerState};

use super::CommandContext;
use crate::cli::OutputFormat;
use crate::format::{format_change_csv, format_change_json, format_change_text};
use crate::style;
use crate::util::{build_client, write_output};

/// Switch an LED to an explicit state.
pub async fn cmd_set(ctx: &CommandContext<'_>, id: LedId, state: PowerState) -> Result<()> {
    let client = build_client(ctx.config)?;
    let sync = StatusSync::new(client, [id]);

    let spinner = style::maybe_spinner(
        ctx.show_progress(),
        &format!("Switching {} {}...", id.label(), state.short_label()),
    );
    let result = sync.set(id, state.is_on()).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    write_change(ctx, id, PowerState::from(result?))
}

/// Print the state an LED was switched to.
pub(super) fn write_change(ctx: &CommandContext<'_>, id: LedId, state: PowerState) -> Result<()> {
    if ctx.quiet && ctx.format == OutputFormat::Text {
        return Ok(());
    }
    let content = match ctx.format {
        OutputFormat::Json => format_change_json(id, state, &ctx.opts)?,
        OutputFormat::Csv => format_change_csv(id, state, &ctx.opts),
        OutputFormat::Text => format_change_text(id, state, &ctx.opts),
    };
    write_output(ctx.output, &content)
}
