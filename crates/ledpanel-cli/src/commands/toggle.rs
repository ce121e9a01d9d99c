//! Toggle command implementation.

use anyhow::Result;
use tracing::debug;

use ledpanel_core::StatusSync;
use ledpanel_types::{LedId, PowerState};

use super::CommandContext;
use super::set::write_change;
use crate::style;
use crate::util::build_client;

/// Flip an LED.
///
/// Without `current` the LED is refreshed first so the write targets the
/// opposite of its actual state. A failed write is returned as an error.
pub async fn cmd_toggle(
    ctx: &CommandContext<'_>,
    id: LedId,
    current: Option<PowerState>,
) -> Result<()> {
    let client = build_client(ctx.config)?;
    let sync = StatusSync::new(client, [id]);

    let current = match current {
        Some(state) => state.is_on(),
        None => {
            let spinner = style::maybe_spinner(ctx.show_progress(), "Reading current state...");
            sync.refresh_all().await;
            if let Some(pb) = spinner {
                pb.finish_and_clear();
            }
            sync.get(id).await.is_some_and(|led| led.is_on)
        }
    };
    debug!(led_id = id.get(), current, "Toggling LED");

    let spinner = style::maybe_spinner(ctx.show_progress(), &format!("Switching {}...", id.label()));
    let result = sync.toggle(id, current).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    write_change(ctx, id, PowerState::from(result?))
}
