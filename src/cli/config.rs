//! `config init`: write a starter craftwatch.toml

use crate::cli::ConfigInitArgs;
use crate::client::parse_base_url;
use crate::config::BackendConfig;
use std::fs;

const EXAMPLE_CONFIG: &str = include_str!("../../craftwatch.example.toml");

/// The example config, with `[backend].url` replaced when `url` is given.
pub fn starter_config(url: Option<&str>) -> Result<String, Box<dyn std::error::Error>> {
    let Some(url) = url else {
        return Ok(EXAMPLE_CONFIG.to_string());
    };
    parse_base_url(url)?;

    let default_line = format!("url = \"{}\"", BackendConfig::default().url);
    if !EXAMPLE_CONFIG.contains(&default_line) {
        return Err("example config has no [backend].url line".into());
    }
    // Written as a TOML string so quotes in the URL stay escaped.
    let value = toml::Value::String(url.to_string());
    Ok(EXAMPLE_CONFIG.replacen(&default_line, &format!("url = {value}"), 1))
}

/// Handle `craftwatch config init`.
pub fn handle_config_init(args: &ConfigInitArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "{} already exists, pass --force to replace it",
            args.output.display()
        )
        .into());
    }

    let content = starter_config(args.url.as_deref())?;
    fs::write(&args.output, content)?;
    tracing::debug!(path = %args.output.display(), "Wrote config file");

    println!("✓ Configuration file created: {}", args.output.display());
    if args.url.is_none() {
        println!("  Set [backend].url to point craftwatch at your event backend.");
    }

    Ok(())
}
