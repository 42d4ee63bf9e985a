use anyhow::{Context, Result, bail};
use recscan_scanner::DEFAULT_API_BASE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_DIR: &str = "~/.config/recscan/";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
pub const API_BASE_ENV: &str = "RECSCAN_API_BASE";

/// Written by `recscan init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# recscan configuration

# YouTube Data API v3 key. The YOUTUBE_API_KEY environment variable and the
# --api-key flag take precedence over this value.
# api_key = "AIza..."

# Base URL of the Data API.
api_base = "https://www.googleapis.com/youtube/v3"

# Overall request timeout in seconds. Leave unset for no timeout.
# timeout_secs = 30

# Default report format: text, json, csv or markdown.
format = "text"

# Reuse responses for identical requests within a run.
cache = true
"#;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_cache")]
    pub cache: bool,
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_cache() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            timeout_secs: None,
            format: default_format(),
            cache: default_cache(),
        }
    }
}

/// Expand `~` in a config directory and return the config file inside it.
pub fn config_path_in(dir: &str) -> PathBuf {
    let expanded = shellexpand::tilde(dir);
    Path::new(expanded.as_ref()).join(CONFIG_FILE_NAME)
}

pub fn default_config_path() -> PathBuf {
    config_path_in(DEFAULT_CONFIG_DIR)
}

impl Settings {
    /// Read settings from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content)?;
        Ok(settings)
    }

    /// Override file values with environment variables found by `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(base) = lookup(API_BASE_ENV).filter(|b| !b.trim().is_empty()) {
            self.api_base = base;
        }
    }

    pub fn require_api_key(&self) -> Result<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => bail!(
                "No API key configured. Pass --api-key, set {} or add api_key to {}",
                API_KEY_ENV,
                default_config_path().display()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_template_parses_to_defaults() {
        let settings = Settings::from_toml_str(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings = Settings::from_toml_str("api_key = \"abc\"\ntimeout_secs = 10\n").unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("abc"));
        assert_eq!(settings.timeout_secs, Some(10));
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
        assert_eq!(settings.format, "text");
        assert!(settings.cache);
    }

    #[test]
    fn test_env_overrides_file() {
        let env: HashMap<&str, &str> =
            HashMap::from([(API_KEY_ENV, "from-env"), (API_BASE_ENV, "http://localhost:9999")]);
        let mut settings = Settings::from_toml_str("api_key = \"from-file\"").unwrap();
        settings.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.api_key.as_deref(), Some("from-env"));
        assert_eq!(settings.api_base, "http://localhost:9999");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut settings = Settings::from_toml_str("api_key = \"from-file\"").unwrap();
        settings.apply_env(|_| Some("  ".to_string()));
        assert_eq!(settings.api_key.as_deref(), Some("from-file"));
        assert_eq!(settings.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_require_api_key() {
        let mut settings = Settings::default();
        assert!(settings.require_api_key().is_err());

        settings.api_key = Some("   ".to_string());
        assert!(settings.require_api_key().is_err());

        settings.api_key = Some(" key ".to_string());
        assert_eq!(settings.require_api_key().unwrap(), "key");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(Settings::from_toml_str("api_key = [").is_err());
        assert!(Settings::from_toml_str("cache = \"yes\"").is_err());
    }

    #[test]
    fn test_config_path_in_appends_file_name() {
        let path = config_path_in("/tmp/recscan");
        assert_eq!(path, PathBuf::from("/tmp/recscan/config.toml"));
    }
}
