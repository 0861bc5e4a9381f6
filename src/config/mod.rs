use crate::core::path::{config_file, ensure_dir};
use crate::core::{HubsyncError, HubsyncResult};
use crate::di::ConfigProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

pub mod options;

pub use options::SyncOptions;

/// Environment variable overriding the Hub endpoint
pub const ENDPOINT_ENV_VAR: &str = "HF_ENDPOINT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hub endpoint (`HF_ENDPOINT` takes precedence when set)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Git revision (branch, tag or commit) to sync from
    #[serde(default = "default_revision")]
    pub revision: String,

    /// Access token used when none is given on the command line,
    /// in `HF_TOKEN`, or in the Hugging Face token file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Include patterns used when `--include` is not given
    #[serde(default = "default_include")]
    pub default_include: Vec<String>,

    /// Exclude patterns used when `--exclude` is not given
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub default_exclude: Vec<String>,

    /// Timeout for API requests (listing, whoami, metadata), in seconds.
    /// File transfers only use it as a connect timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_endpoint() -> String {
    "https://huggingface.co".to_string()
}

fn default_revision() -> String {
    "main".to_string()
}

fn default_include() -> Vec<String> {
    vec!["*.safetensors".to_string()]
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("hubsync/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            revision: default_revision(),
            token: None,
            default_include: default_include(),
            default_exclude: Vec::new(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, creating a default if it doesn't exist
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\hubsync\config.yaml
    /// - Linux: ~/.config/hubsync/config.yaml
    /// - macOS: ~/Library/Application Support/hubsync/config.yaml
    pub fn load() -> HubsyncResult<Self> {
        let config_path = config_file()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> HubsyncResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| HubsyncError::Config(format!("Failed to parse config: {}", e)))?;

        if config.endpoint.trim().is_empty() {
            return Err(HubsyncError::Config("endpoint must not be empty".to_string()));
        }

        Ok(config)
    }

    /// Save config to the platform-specific config directory
    pub fn save(&self) -> HubsyncResult<()> {
        self.save_to(&config_file()?)
    }

    /// Save config to an explicit path
    pub fn save_to(&self, config_path: &Path) -> HubsyncResult<()> {
        let config_dir = config_path
            .parent()
            .ok_or_else(|| HubsyncError::Path("Invalid config path".to_string()))?;

        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| HubsyncError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, content)?;
        Ok(())
    }

    /// Endpoint after applying `HF_ENDPOINT`, without a trailing slash
    pub fn effective_endpoint(&self) -> String {
        let endpoint = std::env::var(ENDPOINT_ENV_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.endpoint.clone());
        endpoint.trim().trim_end_matches('/').to_string()
    }
}

impl ConfigProvider for Config {
    fn endpoint(&self) -> String {
        self.effective_endpoint()
    }

    fn revision(&self) -> &str {
        &self.revision
    }

    fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn default_include(&self) -> &[String] {
        &self.default_include
    }

    fn default_exclude(&self) -> &[String] {
        &self.default_exclude
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
