//! Top-level application configuration.
//!
//! Configuration is stored in `.gactifs/config.yaml` and includes:
//! - Backend location (API base URL, optional separate auth URL) and timeout
//! - Collection view defaults (page size, search debounce, shrink policy)

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ConsoleError, Result};
use crate::paths::config_path;
use crate::view::ShrinkPolicy;

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "GACTIFS_API_URL";

/// Keys accepted by `config get` / `config set`.
pub const VALID_KEYS: &[&str] = &[
    "api.base_url",
    "api.auth_url",
    "api.timeout",
    "view.page_size",
    "view.search_debounce_ms",
    "view.shrink_policy",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default, skip_serializing_if = "ViewConfig::is_default")]
    pub view: ViewConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// REST base URL (default: http://localhost:8080/api)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Authentication base URL (default: `<base_url>/auth`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_url: Option<String>,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            auth_url: None,
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    #[serde(default)]
    pub shrink_policy: ShrinkPolicy,
}

fn default_page_size() -> usize {
    10
}

fn default_search_debounce_ms() -> u64 {
    300
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            page_size: default_page_size(),
            search_debounce_ms: default_search_debounce_ms(),
            shrink_policy: ShrinkPolicy::default(),
        }
    }
}

impl ViewConfig {
    pub fn is_default(&self) -> bool {
        *self == ViewConfig::default()
    }
}

impl Config {
    pub fn config_path() -> PathBuf {
        config_path()
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path)?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Base URL, with `GACTIFS_API_URL` taking precedence over the file.
    pub fn base_url(&self) -> String {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return url.trim_end_matches('/').to_string();
        }
        self.api.base_url.trim_end_matches('/').to_string()
    }

    pub fn auth_url(&self) -> String {
        match &self.api.auth_url {
            Some(url) if !url.is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("{}/auth", self.base_url()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.view.search_debounce_ms)
    }

    /// Read a value by dotted key.
    pub fn get(&self, key: &str) -> Result<String> {
        let value = match key {
            "api.base_url" => self.api.base_url.clone(),
            "api.auth_url" => self.auth_url(),
            "api.timeout" => self.api.timeout.to_string(),
            "view.page_size" => self.view.page_size.to_string(),
            "view.search_debounce_ms" => self.view.search_debounce_ms.to_string(),
            "view.shrink_policy" => self.view.shrink_policy.to_string(),
            _ => return Err(unknown_key(key)),
        };
        Ok(value)
    }

    /// Validate and set a value by dotted key. Does not save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => self.api.base_url = parse_url(key, value)?,
            "api.auth_url" => {
                self.api.auth_url = if value.is_empty() {
                    None
                } else {
                    Some(parse_url(key, value)?)
                }
            }
            "api.timeout" => self.api.timeout = parse_positive(key, value)?,
            "view.page_size" => self.view.page_size = parse_positive(key, value)?,
            "view.search_debounce_ms" => {
                self.view.search_debounce_ms = value.parse().map_err(|_| {
                    ConsoleError::Config(format!(
                        "invalid value '{value}' for {key}. Expected milliseconds"
                    ))
                })?
            }
            "view.shrink_policy" => self.view.shrink_policy = value.parse()?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> ConsoleError {
    ConsoleError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        VALID_KEYS.join(", ")
    ))
}

fn parse_url(key: &str, value: &str) -> Result<String> {
    let url = Url::parse(value)
        .map_err(|e| ConsoleError::Config(format!("invalid URL '{value}' for {key}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConsoleError::Config(format!(
            "{key} must be an http(s) URL, got '{value}'"
        )));
    }
    Ok(value.trim_end_matches('/').to_string())
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(ConsoleError::Config(format!(
            "invalid value '{value}' for {key}. Expected a positive integer"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8080/api");
        assert_eq!(config.api.timeout, 30);
        assert_eq!(config.view.page_size, 10);
        assert_eq!(config.search_debounce(), Duration::from_millis(300));
        assert_eq!(config.view.shrink_policy, ShrinkPolicy::Clamp);
    }

    #[test]
    fn test_config_partial_yaml() {
        let yaml = "api:\n  base_url: https://gactifs.example.sn/api\nview:\n  page_size: 25\n";
        let config: Config = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(config.api.base_url, "https://gactifs.example.sn/api");
        assert_eq!(config.api.timeout, 30);
        assert_eq!(config.view.page_size, 25);
        assert_eq!(config.view.search_debounce_ms, 300);
    }

    #[test]
    fn test_default_view_is_not_serialized() {
        let yaml = serde_yaml_ng::to_string(&Config::default()).unwrap();
        assert!(yaml.contains("base_url"));
        assert!(!yaml.contains("view"));
    }

    #[test]
    #[serial]
    fn test_env_overrides_base_url() {
        let config = Config::default();
        // SAFETY: We use #[serial] to ensure single-threaded access
        unsafe { env::set_var(API_URL_ENV, "http://10.0.0.5:9090/api/") };
        assert_eq!(config.base_url(), "http://10.0.0.5:9090/api");
        assert_eq!(config.auth_url(), "http://10.0.0.5:9090/api/auth");
        unsafe { env::remove_var(API_URL_ENV) };
        assert_eq!(config.base_url(), "http://localhost:8080/api");
    }

    #[test]
    #[serial]
    fn test_explicit_auth_url() {
        unsafe { env::remove_var(API_URL_ENV) };
        let mut config = Config::default();
        config.set("api.auth_url", "http://auth.local/api/v1/auth/").unwrap();
        assert_eq!(config.auth_url(), "http://auth.local/api/v1/auth");
        config.set("api.auth_url", "").unwrap();
        assert_eq!(config.auth_url(), "http://localhost:8080/api/auth");
    }

    #[test]
    fn test_set_validates() {
        let mut config = Config::default();
        assert!(config.set("api.base_url", "ftp://x").is_err());
        assert!(config.set("api.base_url", "not a url").is_err());
        assert!(config.set("view.page_size", "0").is_err());
        assert!(config.set("view.page_size", "-3").is_err());
        assert!(config.set("view.shrink_policy", "sometimes").is_err());
        assert!(config.set("nope", "1").is_err());

        config.set("view.page_size", "20").unwrap();
        config.set("view.shrink_policy", "reset").unwrap();
        config.set("api.timeout", "5").unwrap();
        assert_eq!(config.get("view.page_size").unwrap(), "20");
        assert_eq!(config.get("view.shrink_policy").unwrap(), "reset");
        assert_eq!(config.timeout(), Duration::from_secs(5));
    }
}
