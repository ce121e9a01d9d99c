//! Config command implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use ledpanel_cli::config::{PanelConfig, default_config_path};

use crate::cli::ConfigAction;
use crate::format::FormatOptions;
use crate::style;
use crate::util::write_output;

/// Arguments for the config command.
pub struct ConfigArgs<'a> {
    pub action: ConfigAction,
    pub path: Option<&'a Path>,
    pub url: Option<&'a str>,
    pub json: bool,
    pub output: Option<&'a PathBuf>,
    pub opts: &'a FormatOptions,
}

pub fn cmd_config(args: ConfigArgs<'_>) -> Result<()> {
    let ConfigArgs {
        action,
        path,
        url,
        json,
        output,
        opts,
    } = args;
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    match action {
        ConfigAction::Path => {
            println!("{}", path.display());
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            PanelConfig::default()
                .save(&path)
                .context("Failed to initialize config")?;
            println!(
                "{}",
                style::format_success(
                    &format!("Created config at {}", path.display()),
                    opts.no_color
                )
            );
        }
        ConfigAction::Show => {
            let mut config = PanelConfig::load_or_default(&path)?;
            if let Some(url) = url {
                config = config.with_url_override(url);
            }
            if let Err(e) = config.validate() {
                eprintln!("{}", style::format_warning(&e.to_string(), opts.no_color));
            }

            let content = if json {
                opts.as_json(&config)?
            } else {
                let body = toml::to_string_pretty(&config).context("Failed to serialize config")?;
                format!("# {}\n{}", path.display(), body)
            };
            write_output(output, &content)?;
        }
    }
    Ok(())
}
