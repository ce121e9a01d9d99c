//! Standalone dashboard binary.
//!
//! Reads the same configuration as `ledpanel`: the file named by
//! `LEDPANEL_CONFIG` (or the default path), with `LEDPANEL_URL` overriding
//! the base URL.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use ledpanel_cli::config::PanelConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let path = env::var_os("LEDPANEL_CONFIG").map(PathBuf::from);
    let url = env::var("LEDPANEL_URL").ok().filter(|s| !s.is_empty());

    let config = PanelConfig::resolve(path.as_deref(), url.as_deref())
        .context("Failed to load configuration")?;

    ledpanel_tui::tui::run(config).await
}
