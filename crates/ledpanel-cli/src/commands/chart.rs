//! Chart command implementation.

use anyhow::{Result, bail};

use ledpanel_core::{AggregateRequest, HistoryView};
use ledpanel_types::{ChartKind, LedId};

use super::CommandContext;
use crate::cli::OutputFormat;
use crate::format::{format_chart_csv, format_chart_json, format_chart_text};
use crate::style;
use crate::util::{build_client, resolve_led, write_output};

/// Print an aggregate chart.
///
/// Chart kinds missing from the configuration's `charts` list are refused.
/// Per-LED charts use `led`, or the first configured LED. A failed fetch
/// prints an empty chart.
pub async fn cmd_chart(ctx: &CommandContext<'_>, kind: ChartKind, led: Option<LedId>) -> Result<()> {
    if !ctx.config.chart_enabled(kind) {
        bail!(
            "Chart '{}' is not enabled for this panel. Add it to `charts` in the config file.",
            kind
        );
    }

    let request = if kind.is_per_led() {
        AggregateRequest::new(kind, resolve_led(ctx.config, led)?)
    } else {
        AggregateRequest::OnTimeTotals
    };

    let view = HistoryView::new(build_client(ctx.config)?);
    let spinner = style::maybe_spinner(ctx.show_progress(), "Loading chart data...");
    let series = view.fetch_aggregate(request).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let content = match ctx.format {
        OutputFormat::Json => format_chart_json(&series, &ctx.opts)?,
        OutputFormat::Csv => format_chart_csv(&series, &ctx.opts),
        OutputFormat::Text => format_chart_text(&series, &ctx.opts),
    };

    write_output(ctx.output, &content)?;
    Ok(())
}
