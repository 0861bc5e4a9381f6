//! Trait definitions for dependency injection

use crate::core::HubsyncResult;
use crate::hub::types::{FetchRequest, Identity};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// Trait for configuration access
///
/// Provides read-only access to application configuration.
/// Implementations should be thread-safe (Send + Sync).
pub trait ConfigProvider: Send + Sync {
    /// Get the Hub endpoint, without a trailing slash
    fn endpoint(&self) -> String;

    /// Get the revision to sync from
    fn revision(&self) -> &str;

    /// Get the configured access token (lowest-priority source)
    fn token(&self) -> Option<&str>;

    /// Get the include patterns used when none are given
    fn default_include(&self) -> &[String];

    /// Get the exclude patterns used when none are given
    fn default_exclude(&self) -> &[String];

    /// Get the timeout for API requests
    fn request_timeout(&self) -> Duration;

    /// Get the User-Agent header value
    fn user_agent(&self) -> &str;
}

/// Trait for remote repository operations
///
/// The listing, download and identity primitives a sync session is built
/// on. Credentials are bound at construction time.
#[async_trait]
pub trait HubProvider: Send + Sync {
    /// List every file path in a repository, in the order the Hub reports them
    async fn list_files(&self, repo_id: &str) -> HubsyncResult<Vec<String>>;

    /// Download a file, or with `local_only` set, check the local copy without transferring
    ///
    /// Returns the final local path of the file.
    async fn fetch_file(&self, request: &FetchRequest) -> HubsyncResult<PathBuf>;

    /// Identify the account the credentials belong to
    async fn whoami(&self) -> HubsyncResult<Identity>;
}
