//! Top-level application configuration.
//!
//! Configuration is stored in `config.yaml` under the platform config
//! directory (or at `$SCHOLARDESK_CONFIG`) and includes:
//! - API base URL, request timeout and bearer token
//! - List defaults: page size, sort direction, per-screen page sizes

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScholarError};
use crate::query::SortOrder;
use crate::record::Resource;
use crate::screen::{DEFAULT_PAGE_SIZE, ScreenConfig};

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "SCHOLARDESK_CONFIG";
/// Overrides `api.base_url`
pub const API_URL_ENV: &str = "SCHOLARDESK_API_URL";
/// Overrides `api.token`
pub const API_TOKEN_ENV: &str = "SCHOLARDESK_API_TOKEN";

/// Keys accepted by `config get` / `config set`, besides
/// `list.screens.<resource>.page_size`.
pub const CONFIG_KEYS: &[&str] = &[
    "api.base_url",
    "api.timeout",
    "api.token",
    "list.page_size",
    "list.default_order",
];

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default, skip_serializing_if = "ListConfig::is_default")]
    pub list: ListConfig,
}

/// Backend connection settings
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: default_timeout(),
            token: None,
        }
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// List screen defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Direction used when a new sort key is picked
    #[serde(default)]
    pub default_order: SortOrder,

    /// Per-resource overrides, keyed by resource name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub screens: HashMap<String, ScreenOverride>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_order: SortOrder::default(),
            screens: HashMap::new(),
        }
    }
}

impl ListConfig {
    /// Check if this config is the default (for serialization skip)
    pub fn is_default(&self) -> bool {
        self.page_size == default_page_size()
            && self.default_order == SortOrder::default()
            && self.screens.is_empty()
    }
}

/// Settings for a single list screen
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_positive(key: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ScholarError::Config(format!(
            "invalid value '{value}' for {key}. Expected a positive integer"
        ))),
    }
}

fn page_size_value(key: &str, value: &str) -> Result<usize> {
    let n = parse_positive(key, value)?;
    usize::try_from(n)
        .map_err(|_| ScholarError::Config(format!("invalid value '{value}' for {key}: too large")))
}

/// `list.screens.<resource>.page_size` → the resource
fn screen_key(key: &str) -> Option<Result<Resource>> {
    let resource = key
        .strip_prefix("list.screens.")?
        .strip_suffix(".page_size")?;
    Some(resource.parse())
}

fn unknown_key(key: &str) -> ScholarError {
    ScholarError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}, list.screens.<resource>.page_size",
        CONFIG_KEYS.join(", ")
    ))
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        if let Some(path) = non_empty_env(CONFIG_PATH_ENV) {
            return Ok(PathBuf::from(path));
        }
        ProjectDirs::from("", "", "scholardesk")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .ok_or_else(|| {
                ScholarError::Config(format!(
                    "could not determine a config directory; set {CONFIG_PATH_ENV}"
                ))
            })
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ScholarError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {e}", path.display()),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ScholarError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {e}",
                        parent.display()
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            ScholarError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {e}", path.display()),
            ))
        })?;

        // Owner read/write only: the file may hold the API token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(|e| {
                ScholarError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to set permissions on config at {}: {e}", path.display()),
                ))
            })?;
        }

        Ok(())
    }

    /// API base URL from the environment or the config file
    pub fn api_base_url(&self) -> Option<String> {
        non_empty_env(API_URL_ENV).or_else(|| self.api.base_url.clone())
    }

    /// API token from the environment or the config file
    pub fn api_token(&self) -> Option<String> {
        non_empty_env(API_TOKEN_ENV).or_else(|| self.api.token.clone())
    }

    pub fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout)
    }

    /// Page size for a resource's list screen
    pub fn page_size(&self, resource: Resource) -> usize {
        self.list
            .screens
            .get(resource.path())
            .and_then(|s| s.page_size)
            .unwrap_or(self.list.page_size)
            .max(1)
    }

    /// Screen configuration with the configured defaults applied
    pub fn screen(&self, resource: Resource) -> ScreenConfig {
        ScreenConfig::for_resource(resource)
            .with_page_size(self.page_size(resource))
            .with_default_order(self.list.default_order)
    }

    /// Read a value by dotted key. Unset values are `None`.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "api.base_url" => self.api.base_url.clone(),
            "api.timeout" => Some(self.api.timeout.to_string()),
            "api.token" => self.api.token.clone(),
            "list.page_size" => Some(self.list.page_size.to_string()),
            "list.default_order" => Some(self.list.default_order.to_string()),
            _ => match screen_key(key) {
                Some(resource) => self
                    .list
                    .screens
                    .get(resource?.path())
                    .and_then(|s| s.page_size)
                    .map(|n| n.to_string()),
                None => return Err(unknown_key(key)),
            },
        };
        Ok(value)
    }

    /// Set a value by dotted key, validating it first.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                let url = url::Url::parse(value.trim()).map_err(|e| {
                    ScholarError::Config(format!("invalid value '{value}' for api.base_url: {e}"))
                })?;
                self.api.base_url = Some(url.to_string());
            }
            "api.timeout" => self.api.timeout = parse_positive(key, value)?,
            "api.token" => {
                let token = value.trim();
                self.api.token = (!token.is_empty()).then(|| token.to_string());
            }
            "list.page_size" => self.list.page_size = page_size_value(key, value)?,
            "list.default_order" => self.list.default_order = value.parse()?,
            _ => match screen_key(key) {
                Some(resource) => {
                    let resource = resource?;
                    let page_size = page_size_value(key, value)?;
                    self.list
                        .screens
                        .entry(resource.path().to_string())
                        .or_default()
                        .page_size = Some(page_size);
                }
                None => return Err(unknown_key(key)),
            },
        }
        Ok(())
    }
}
