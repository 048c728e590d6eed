//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Validate and store one value

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{API_URL_ENV, Config};
use crate::error::{ConsoleError, Result};

/// Reject `api_base_url`-style keys with a hint at the dotted form.
fn validate_config_key(key: &str) -> Result<&str> {
    if !key.contains('.')
        && let Some(pos) = key.find('_')
    {
        let dot_version = format!("{}.{}", &key[..pos], &key[pos + 1..]);
        return Err(ConsoleError::Config(format!(
            "invalid config key '{key}'. Use dot notation: '{dot_version}'"
        )));
    }
    Ok(key)
}

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let env_override = std::env::var(API_URL_ENV).ok().filter(|v| !v.is_empty());

    let json_output = json!({
        "api": {
            "base_url": config.base_url(),
            "auth_url": config.auth_url(),
            "timeout": config.api.timeout,
            "base_url_from_env": env_override.is_some(),
        },
        "view": {
            "page_size": config.view.page_size,
            "search_debounce_ms": config.view.search_debounce_ms,
            "shrink_policy": config.view.shrink_policy.as_str(),
        },
        "config_file": Config::config_path().to_string_lossy(),
    });

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));

    text_output.push_str(&format!("{}:\n", "api".cyan()));
    text_output.push_str(&format!("  base_url: {}", config.base_url()));
    if env_override.is_some() {
        text_output.push_str(&format!(" {}", format!("(from {API_URL_ENV})").dimmed()));
    }
    text_output.push('\n');
    text_output.push_str(&format!("  auth_url: {}\n", config.auth_url()));
    text_output.push_str(&format!("  timeout: {}s\n", config.api.timeout));

    text_output.push('\n');

    text_output.push_str(&format!("{}:\n", "view".cyan()));
    text_output.push_str(&format!("  page_size: {}\n", config.view.page_size));
    text_output.push_str(&format!(
        "  search_debounce_ms: {}\n",
        config.view.search_debounce_ms
    ));
    text_output.push_str(&format!("  shrink_policy: {}\n", config.view.shrink_policy));

    text_output.push('\n');
    text_output.push_str(&format!(
        "{}",
        format!("Config file: {}", Config::config_path().display()).dimmed()
    ));

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;

    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    let stored = config.get(key)?;

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": stored,
        "success": true,
    }))
    .with_text(format!("Set {} to {}", key.cyan(), stored))
    .print(output)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    validate_config_key(key)?;
    let config = Config::load()?;
    let value = config.get(key)?;
    CommandOutput::new(json!({ "key": key, "value": value }))
        .with_text(value)
        .print(output)
}
