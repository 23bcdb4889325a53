use std::path::Path;

use anyhow::{Context, Result};

use nef_forge::nef::config::{ConvertConfig, load_config};

/// Loads `--config FILE` over the embedded defaults.
pub fn build_convert_config(path: Option<&Path>) -> Result<ConvertConfig> {
    let text = path
        .map(|p| {
            std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read config file: {}", p.display()))
        })
        .transpose()?;
    let config = load_config(text.as_deref()).with_context(|| match path {
        Some(p) => format!("Invalid config file: {}", p.display()),
        None => "Invalid built-in configuration".to_string(),
    })?;
    Ok(config)
}
