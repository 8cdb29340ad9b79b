//! Configuration commands for managing scholardesk settings.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print one value
//! - `config set`: Set a configuration value

use owo_colors::{OwoColorize, Stream};
use serde_json::json;

use super::CommandOutput;
use crate::config::{CONFIG_KEYS, Config};
use crate::error::{Result, ScholarError};

/// Reject keys without a section and suggest the dotted form
fn validate_config_key(key: &str) -> Result<&str> {
    if key.contains('.') {
        return Ok(key);
    }
    let suggestion = CONFIG_KEYS
        .iter()
        .find(|k| k.rsplit('.').next() == Some(key));
    Err(ScholarError::Config(match suggestion {
        Some(full) => format!("invalid config key '{key}'. Use dot notation: '{full}'"),
        None => format!(
            "invalid config key '{key}'. Valid keys: {}, list.screens.<resource>.page_size",
            CONFIG_KEYS.join(", ")
        ),
    }))
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}

fn heading(text: &str) -> String {
    text.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
}

fn not_configured() -> String {
    "not configured"
        .if_supports_color(Stream::Stdout, |s| s.dimmed())
        .to_string()
}

/// Show current configuration
pub fn cmd_config_show(json: bool) -> Result<()> {
    let config = Config::load()?;
    let config_path = Config::config_path()?;

    let base_url = config.api_base_url();
    let token_configured = config.api_token().is_some();

    let mut screens: Vec<_> = config
        .list
        .screens
        .iter()
        .filter_map(|(name, s)| s.page_size.map(|size| (name.clone(), size)))
        .collect();
    screens.sort();

    let json_output = json!({
        "api": {
            "base_url": base_url,
            "timeout": config.api.timeout,
            "token_configured": token_configured,
        },
        "list": {
            "page_size": config.list.page_size,
            "default_order": config.list.default_order.to_string(),
            "screens": screens
                .iter()
                .map(|(name, size)| (name.clone(), json!({ "page_size": size })))
                .collect::<serde_json::Map<_, _>>(),
        },
        "config_file": config_path.to_string_lossy(),
    });

    let mut text = format!(
        "{}\n\n",
        "Configuration:".if_supports_color(Stream::Stdout, |s| s.bold())
    );

    text.push_str(&format!("{}:\n", heading("api")));
    text.push_str(&format!(
        "  base_url: {}\n",
        base_url.clone().unwrap_or_else(not_configured)
    ));
    text.push_str(&format!("  timeout: {}s\n", config.api.timeout));
    let token_status = if token_configured {
        "configured"
            .if_supports_color(Stream::Stdout, |s| s.green())
            .to_string()
    } else {
        not_configured()
    };
    text.push_str(&format!("  token: {token_status}\n\n"));

    text.push_str(&format!("{}:\n", heading("list")));
    text.push_str(&format!("  page_size: {}\n", config.list.page_size));
    text.push_str(&format!("  default_order: {}\n", config.list.default_order));
    for (name, size) in &screens {
        text.push_str(&format!("  screens.{name}.page_size: {size}\n"));
    }

    text.push('\n');
    text.push_str(
        &format!("Config file: {}", config_path.display())
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string(),
    );

    CommandOutput::new(json_output).with_text(text).print(json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, json: bool) -> Result<()> {
    validate_config_key(key)?;

    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;
    tracing::info!("config key {key} updated");

    let (json_output, text) = if key == "api.token" {
        (
            json!({ "action": "config_set", "key": key, "success": true }),
            format!("Set {}", heading(key)),
        )
    } else {
        let stored = config.get(key)?.unwrap_or_default();
        (
            json!({ "action": "config_set", "key": key, "value": stored, "success": true }),
            format!("Set {} to {stored}", heading(key)),
        )
    };

    CommandOutput::new(json_output).with_text(text).print(json)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, json: bool) -> Result<()> {
    validate_config_key(key)?;

    let config = Config::load()?;
    let value = match key {
        "api.base_url" => config.api_base_url(),
        "api.token" => config.api_token(),
        _ => config.get(key)?,
    };
    let Some(value) = value else {
        return Err(ScholarError::Config(format!("{key} not set")));
    };

    let (json_output, text) = if key == "api.token" {
        let masked = mask_sensitive_value(&value);
        (
            json!({ "key": key, "value": masked, "configured": true, "masked": true }),
            format!("{masked} (masked - showing first 2 and last 2 characters)"),
        )
    } else {
        (
            json!({ "key": key, "value": value, "configured": true }),
            value,
        )
    };

    CommandOutput::new(json_output).with_text(text).print(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config_key_suggests_dotted_form() {
        let err = validate_config_key("timeout").unwrap_err();
        assert_eq!(
            err.to_string(),
            "configuration error: invalid config key 'timeout'. Use dot notation: 'api.timeout'"
        );
        assert!(validate_config_key("api.timeout").is_ok());
        assert!(validate_config_key("colour").is_err());
    }

    #[test]
    fn test_mask_sensitive_value_ascii() {
        assert_eq!(mask_sensitive_value("abcdef"), "ab...ef");
        assert_eq!(mask_sensitive_value("12345678"), "12...78");
    }

    #[test]
    fn test_mask_sensitive_value_short() {
        assert_eq!(mask_sensitive_value("abcd"), "****");
        assert_eq!(mask_sensitive_value(""), "****");
    }

    #[test]
    fn test_mask_sensitive_value_multibyte_utf8() {
        assert_eq!(mask_sensitive_value("ñéàöüî"), "ñé...üî");
        assert_eq!(mask_sensitive_value("日本語中文"), "日本...中文");
    }
}
