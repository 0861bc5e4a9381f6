//! Mock implementations of service traits for testing

use super::traits::{ConfigProvider, HubProvider};
use crate::core::path::{ensure_parent_dir, local_file_path};
use crate::core::{HubsyncError, HubsyncResult};
use crate::hub::types::{FetchRequest, Identity};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock configuration provider for testing
///
/// # Example
///
/// ```
/// use hubsync::di::mocks::MockConfigProvider;
/// use hubsync::di::ConfigProvider;
///
/// let mut config = MockConfigProvider::default();
/// config.revision = "v2".to_string();
///
/// assert_eq!(config.revision(), "v2");
/// ```
#[derive(Clone)]
pub struct MockConfigProvider {
    pub endpoint: String,
    pub revision: String,
    pub token: Option<String>,
    pub default_include: Vec<String>,
    pub default_exclude: Vec<String>,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for MockConfigProvider {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9".to_string(),
            revision: "main".to_string(),
            token: None,
            default_include: vec!["*.safetensors".to_string()],
            default_exclude: Vec::new(),
            request_timeout: Duration::from_secs(5),
            user_agent: "hubsync-test".to_string(),
        }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn endpoint(&self) -> String {
        self.endpoint.clone()
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
        self.request_timeout
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// Mock Hub provider for testing
///
/// Holds a repository listing and file contents in memory. Downloads write
/// the content under the request's local root; verify-only checks compare
/// the local file byte-for-byte with the stored content.
///
/// # Example
///
/// ```
/// use hubsync::di::mocks::MockHubProvider;
///
/// let hub = MockHubProvider::new();
/// hub.add_file("model.safetensors", b"weights".to_vec());
/// hub.fail_downloads_of("model.safetensors");
/// ```
#[derive(Clone, Default)]
pub struct MockHubProvider {
    listing: Arc<Mutex<Vec<String>>>,
    contents: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    listing_error: Arc<Mutex<Option<String>>>,
    identity: Arc<Mutex<Option<Identity>>>,
    requests: Arc<Mutex<Vec<FetchRequest>>>,
}

impl MockHubProvider {
    /// Create a new mock Hub provider with an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file to the listing and store its content
    pub fn add_file(&self, remote_path: &str, content: Vec<u8>) {
        self.listing.lock().unwrap().push(remote_path.to_string());
        self.contents
            .lock()
            .unwrap()
            .insert(remote_path.to_string(), content);
    }

    /// Append a listing entry without touching stored content (duplicates allowed)
    pub fn add_listing_entry(&self, remote_path: &str) {
        self.listing.lock().unwrap().push(remote_path.to_string());
    }

    /// Make every download of a path fail
    pub fn fail_downloads_of(&self, remote_path: &str) {
        self.failing.lock().unwrap().insert(remote_path.to_string());
    }

    /// Make listing fail with the given message
    pub fn fail_listing(&self, message: &str) {
        *self.listing_error.lock().unwrap() = Some(message.to_string());
    }

    /// Accept whoami with the given account name
    pub fn set_identity(&self, name: &str) {
        *self.identity.lock().unwrap() = Some(Identity {
            name: name.to_string(),
            fullname: None,
            kind: Some("user".to_string()),
        });
    }

    /// All fetch requests received so far, in order
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Remote paths of the transferring (non verify-only) requests, in order
    pub fn downloads(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter(|r| !r.local_only)
            .map(|r| r.remote_path)
            .collect()
    }
}

#[async_trait]
impl HubProvider for MockHubProvider {
    async fn list_files(&self, repo_id: &str) -> HubsyncResult<Vec<String>> {
        if let Some(message) = self.listing_error.lock().unwrap().clone() {
            return Err(HubsyncError::Listing(format!("{}: {}", repo_id, message)));
        }
        Ok(self.listing.lock().unwrap().clone())
    }

    async fn fetch_file(&self, request: &FetchRequest) -> HubsyncResult<PathBuf> {
        self.requests.lock().unwrap().push(request.clone());

        let local_path = local_file_path(&request.local_root, &request.remote_path);
        let expected = self
            .contents
            .lock()
            .unwrap()
            .get(&request.remote_path)
            .cloned();

        if request.local_only {
            let actual = std::fs::read(&local_path).map_err(|e| {
                HubsyncError::Transfer(format!("{}: {}", request.remote_path, e))
            })?;
            return match expected {
                Some(content) if content == actual => Ok(local_path),
                _ => Err(HubsyncError::Integrity(format!(
                    "{} does not match the remote copy",
                    request.remote_path
                ))),
            };
        }

        if self.failing.lock().unwrap().contains(&request.remote_path) {
            return Err(HubsyncError::Transfer(format!(
                "{}: connection reset",
                request.remote_path
            )));
        }

        let content = expected.ok_or_else(|| {
            HubsyncError::Transfer(format!("{}: not found (HTTP 404)", request.remote_path))
        })?;
        ensure_parent_dir(&local_path)?;
        std::fs::write(&local_path, content)?;
        Ok(local_path)
    }

    async fn whoami(&self) -> HubsyncResult<Identity> {
        self.identity
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| HubsyncError::Auth("Invalid credentials".to_string()))
    }
}
