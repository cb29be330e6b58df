use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 5_000;

/// Top-level config (warden.toml + WARDEN_* env overrides).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WardenConfig {
    #[serde(default)]
    pub panel: PanelConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

/// Where the panel lives and how to authenticate against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PanelConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// API generation, used as the `/api/{version}` route prefix.
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_version: default_api_version(),
            api_key: String::new(),
            api_key_header: default_api_key_header(),
        }
    }
}

/// Per-request bounds. Both must be non-zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_connect_ms")]
    pub connect_ms: u64,
    /// Longest wait for any single socket read, including the response head.
    #[serde(default = "default_read_ms")]
    pub read_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_ms: DEFAULT_CONNECT_TIMEOUT_MS,
            read_ms: DEFAULT_READ_TIMEOUT_MS,
        }
    }
}

impl TimeoutConfig {
    pub fn connect(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.connect_ms)
    }

    pub fn read(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.read_ms)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}
fn default_api_key_header() -> String {
    DEFAULT_API_KEY_HEADER.to_string()
}
fn default_connect_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}
fn default_read_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

impl WardenConfig {
    /// Load config from a TOML file with WARDEN_* env var overrides.
    ///
    /// Checks in order:
    ///   1. Explicit path argument
    ///   2. `WARDEN_CONFIG` env var
    ///   3. ~/.warden/warden.toml
    ///
    /// Nested keys use a double underscore: `WARDEN_PANEL__API_KEY`.
    /// A missing file is not an error; defaults and env still apply.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = config_path
            .map(String::from)
            .or_else(|| std::env::var("WARDEN_CONFIG").ok())
            .unwrap_or_else(default_config_path);

        let config: WardenConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("WARDEN_").ignore(&["CONFIG"]).split("__"))
            .extract()
            .map_err(|e| ApiError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would leave a request unbounded or unroutable.
    pub fn validate(&self) -> Result<()> {
        if self.timeouts.connect_ms == 0 || self.timeouts.read_ms == 0 {
            return Err(ApiError::Config(
                "timeouts.connect_ms and timeouts.read_ms must be greater than zero".to_string(),
            ));
        }
        if self.panel.base_url.trim().is_empty() {
            return Err(ApiError::Config("panel.base_url is empty".to_string()));
        }
        Ok(())
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.warden/warden.toml", home)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_file() {
        Jail::expect_with(|_jail| {
            let config = WardenConfig::load(Some("missing.toml")).expect("load");
            assert_eq!(config.panel.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.panel.api_key_header, "X-API-Key");
            assert_eq!(config.timeouts.connect_ms, 5_000);
            assert_eq!(config.timeouts.read_ms, 5_000);
            Ok(())
        });
    }

    #[test]
    fn file_and_env_are_merged() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "warden.toml",
                r#"
                [panel]
                base_url = "https://panel.example.com"
                api_version = "v2"

                [timeouts]
                read_ms = 8000
                "#,
            )?;
            jail.set_env("WARDEN_PANEL__API_KEY", "secret-key");

            let config = WardenConfig::load(Some("warden.toml")).expect("load");
            assert_eq!(config.panel.base_url, "https://panel.example.com");
            assert_eq!(config.panel.api_version, "v2");
            assert_eq!(config.panel.api_key, "secret-key");
            assert_eq!(config.timeouts.read_ms, 8000);
            assert_eq!(config.timeouts.connect_ms, 5_000);
            Ok(())
        });
    }

    #[test]
    fn zero_timeout_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("warden.toml", "[timeouts]\nconnect_ms = 0\n")?;
            let err = WardenConfig::load(Some("warden.toml")).unwrap_err();
            assert!(matches!(err, ApiError::Config(_)));
            Ok(())
        });
    }
}
