//! Service container for dependency injection

use super::traits::{ConfigProvider, HubProvider};
use crate::config::Config;
use crate::core::{resolve_token, HubsyncResult};
use crate::hub::HubClient;
use std::path::Path;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds the configuration and the Hub provider as trait objects, so a
/// session can run against the real Hub or an in-memory mock.
///
/// # Example (Testing)
///
/// ```
/// use hubsync::di::{ServiceContainer, mocks::*};
/// use std::sync::Arc;
///
/// let config = Arc::new(MockConfigProvider::default());
/// let hub = Arc::new(MockHubProvider::new());
///
/// let container = ServiceContainer::with_providers(config, hub);
/// assert_eq!(container.config().revision(), "main");
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<dyn ConfigProvider>,
    pub hub: Arc<dyn HubProvider>,
}

impl ServiceContainer {
    /// Create a service container with production implementations
    ///
    /// Loads config (from `config_path` when given, otherwise the platform
    /// config file), resolves the access token, and builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be loaded or the HTTP client
    /// cannot be built.
    pub fn new(config_path: Option<&Path>, token: Option<&str>) -> HubsyncResult<Self> {
        let config = match config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        Self::from_config(config, token)
    }

    /// Create a service container from an already loaded config
    pub fn from_config(config: Config, token: Option<&str>) -> HubsyncResult<Self> {
        let credentials = resolve_token(token, config.token.as_deref());
        match credentials {
            Some(ref creds) => tracing::debug!("Using access token from {}", creds.source()),
            None => tracing::debug!("No access token; using anonymous access"),
        }

        let hub = HubClient::new(&config, credentials)?;

        Ok(Self {
            config: Arc::new(config),
            hub: Arc::new(hub),
        })
    }

    /// Create a service container with custom provider implementations
    pub fn with_providers(config: Arc<dyn ConfigProvider>, hub: Arc<dyn HubProvider>) -> Self {
        Self { config, hub }
    }

    /// Get the configuration provider
    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    /// Get a shared handle to the Hub provider
    pub fn hub(&self) -> Arc<dyn HubProvider> {
        Arc::clone(&self.hub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::di::mocks::{MockConfigProvider, MockHubProvider};
    use serial_test::serial;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_with_providers_uses_injected_hub() {
        let hub = MockHubProvider::new();
        hub.add_file("a.safetensors", b"a".to_vec());
        let container = ServiceContainer::with_providers(
            Arc::new(MockConfigProvider::default()),
            Arc::new(hub),
        );

        let files = container.hub().list_files("org/x").await.unwrap();
        assert_eq!(files, vec!["a.safetensors".to_string()]);
    }

    #[test]
    #[serial]
    fn test_new_with_explicit_config_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "endpoint: http://localhost:1234/\nrevision: dev\n").unwrap();
        std::env::remove_var(crate::config::ENDPOINT_ENV_VAR);

        let container = ServiceContainer::new(Some(&path), Some("hf_x")).unwrap();
        assert_eq!(container.config().endpoint(), "http://localhost:1234");
        assert_eq!(container.config().revision(), "dev");
    }
}
