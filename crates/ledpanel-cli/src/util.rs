//! Utility functions for CLI operations.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use ledpanel_cli::config::PanelConfig;
use ledpanel_core::LedClient;
use ledpanel_types::LedId;

/// Build an HTTP client for the configured service.
pub fn build_client(config: &PanelConfig) -> Result<Arc<LedClient>> {
    let client = LedClient::new(config.client_config())
        .with_context(|| format!("Failed to create client for {}", config.base_url))?;
    Ok(Arc::new(client))
}

/// LED for a per-LED command: the explicit one, else the first configured.
pub fn resolve_led(config: &PanelConfig, led: Option<LedId>) -> Result<LedId> {
    led.or_else(|| config.led_ids().first().copied())
        .ok_or_else(|| {
            anyhow::anyhow!("No LED specified. Use --led <ID> or list LEDs in the config file.")
        })
}

/// Write output to file or stdout
pub fn write_output(output: Option<&PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }
        None => {
            print!("{}", content);
            io::stdout().flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_led_prefers_arg() {
        let config = PanelConfig::default();
        let led = resolve_led(&config, Some(LedId::new(7).unwrap())).unwrap();
        assert_eq!(led.get(), 7);
    }

    #[test]
    fn test_resolve_led_falls_back_to_first_configured() {
        let config = PanelConfig {
            leds: vec![4, 2],
            ..Default::default()
        };
        assert_eq!(resolve_led(&config, None).unwrap().get(), 4);
    }

    #[test]
    fn test_resolve_led_none_configured() {
        let config = PanelConfig {
            leds: vec![],
            ..Default::default()
        };
        let err = resolve_led(&config, None).unwrap_err().to_string();
        assert!(err.contains("No LED specified"));
    }

    #[test]
    fn test_write_output_to_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out.txt");
        write_output(Some(&path), "hello\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_build_client_rejects_bad_url() {
        let config = PanelConfig::default().with_url_override("localhost:3000");
        assert!(build_client(&config).is_err());
    }
}
