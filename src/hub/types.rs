//! Hub API payloads and request types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Model information returned by `/api/models/{repo}/revision/{rev}`
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    #[serde(default)]
    pub id: Option<String>,
    /// Commit the listing was taken at
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub siblings: Vec<Sibling>,
}

/// One file entry in a repository listing
#[derive(Debug, Clone, Deserialize)]
pub struct Sibling {
    pub rfilename: String,
}

/// Account information returned by `/api/whoami-v2`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    #[serde(default)]
    pub fullname: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Error body the Hub returns on failed API calls
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Parameters of a single file download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub repo_id: String,
    pub remote_path: String,
    pub local_root: PathBuf,
    /// Transfer even when the local copy already matches
    pub force_refresh: bool,
    /// Continue a partial transfer instead of starting over
    pub allow_resume: bool,
    /// Only check the local copy; never touch the network
    pub local_only: bool,
}

impl FetchRequest {
    /// A forced, resumable download
    pub fn download(repo_id: &str, remote_path: &str, local_root: &Path) -> Self {
        Self {
            repo_id: repo_id.to_string(),
            remote_path: remote_path.to_string(),
            local_root: local_root.to_path_buf(),
            force_refresh: true,
            allow_resume: true,
            local_only: false,
        }
    }

    /// A verify-only check of the local copy
    pub fn verify_only(repo_id: &str, remote_path: &str, local_root: &Path) -> Self {
        Self {
            repo_id: repo_id.to_string(),
            remote_path: remote_path.to_string(),
            local_root: local_root.to_path_buf(),
            force_refresh: false,
            allow_resume: false,
            local_only: true,
        }
    }
}
