use anyhow::{Context, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub progress: ProgressConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Attempts for idempotent GET requests (1 disables retries)
    #[serde(default = "default_max_get_retries")]
    pub max_get_retries: u32,

    #[serde(default = "default_retry_initial_delay")]
    pub retry_initial_delay_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// Used for the client-side calorie estimate
    #[serde(default = "default_body_weight")]
    pub body_weight_kg: f64,

    /// Offset used to decide calendar days for streaks
    #[serde(default)]
    pub utc_offset_minutes: i32,

    /// Compute progress locally instead of asking the server
    #[serde(default)]
    pub prefer_local: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_get_retries() -> u32 {
    3
}

fn default_retry_initial_delay() -> u64 {
    100
}

fn default_body_weight() -> f64 {
    70.0
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_list_limit() -> usize {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            max_get_retries: default_max_get_retries(),
            retry_initial_delay_ms: default_retry_initial_delay(),
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            body_weight_kg: default_body_weight(),
            utc_offset_minutes: 0,
            prefer_local: false,
        }
    }
}

impl ProgressConfig {
    /// Configured offset, falling back to UTC when out of range
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60))
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            list_limit: default_list_limit(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.fittrack/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".fittrack"))
    }

    /// Get config file path (~/.fittrack/config.toml)
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default location
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(p.to_path_buf()),
            None => Self::config_file(),
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file()?)
    }

    /// Load configuration from file, using defaults when it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Check if a token is stored
    pub fn is_authenticated(&self) -> bool {
        !self.auth.token.is_empty()
    }

    pub fn set_token(&mut self, token: String) {
        self.auth.token = token;
    }

    pub fn clear_token(&mut self) {
        self.auth.token.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:9000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.api.max_get_retries, 3);
        assert_eq!(config.progress.body_weight_kg, 70.0);
        assert!(!config.is_authenticated());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        assert_eq!(config.api.base_url, deserialized.api.base_url);
        assert_eq!(config.ui.list_limit, deserialized.ui.list_limit);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[api]\nbase_url = \"https://fit.example\"\n").unwrap();
        assert_eq!(config.api.base_url, "https://fit.example");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.ui.date_format, "%Y-%m-%d");
    }

    #[test]
    fn test_save_and_load_roundtrip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set_token("secret".to_string());
        config.progress.utc_offset_minutes = 180;
        config.save_to(&path)?;

        let loaded = Config::load_from(&path)?;
        assert!(loaded.is_authenticated());
        assert_eq!(loaded.progress.utc_offset().local_minus_utc(), 3 * 3600);

        Ok(())
    }

    #[test]
    fn test_missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = Config::load_from(&dir.path().join("absent.toml"))?;
        assert_eq!(config.api.base_url, "http://localhost:9000");
        Ok(())
    }
}
