//! Per-item download execution

use crate::core::path::ensure_parent_dir;
use crate::di::HubProvider;
use crate::hub::types::FetchRequest;
use crate::sync::planner::PlanItem;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Failure of a single plan item
///
/// Never aborts the session; it is recorded in the summary instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub remote_path: String,
    pub message: String,
}

impl FetchError {
    pub fn new(remote_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            remote_path: remote_path.into(),
            message: message.into(),
        }
    }

    /// Recorded for items left unfetched after an abort request
    pub fn cancelled(remote_path: impl Into<String>) -> Self {
        Self::new(remote_path, "cancelled")
    }
}

/// Downloads plan items through the Hub provider
#[derive(Clone)]
pub struct FetchExecutor {
    hub: Arc<dyn HubProvider>,
    repo_id: String,
    local_root: PathBuf,
}

impl FetchExecutor {
    pub fn new(hub: Arc<dyn HubProvider>, repo_id: &str, local_root: &Path) -> Self {
        Self {
            hub,
            repo_id: repo_id.to_string(),
            local_root: local_root.to_path_buf(),
        }
    }

    /// Download one item, forcing a refresh and resuming partial transfers
    ///
    /// Returns the path reported by the provider.
    pub async fn fetch(&self, item: &PlanItem) -> Result<PathBuf, FetchError> {
        ensure_parent_dir(&item.local_path)
            .map_err(|e| FetchError::new(&item.remote_path, e.to_string()))?;

        let request = FetchRequest::download(&self.repo_id, &item.remote_path, &self.local_root);
        self.hub.fetch_file(&request).await.map_err(|e| {
            tracing::warn!("Download of {} failed: {}", item.remote_path, e);
            FetchError::new(&item.remote_path, e.to_string())
        })
    }
}
