//! Local file validity checks

use crate::di::HubProvider;
use crate::hub::types::FetchRequest;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Block size used when hashing files
pub const HASH_BLOCK_SIZE: usize = 4096;

/// SHA-256 of a file as lowercase hex
///
/// Returns `None` when the file does not exist or cannot be read. An
/// unknown digest must be treated the same as a mismatch.
pub fn file_sha256(path: &Path) -> Option<String> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!("Error calculating hash for {}: {}", path.display(), e);
            return None;
        }
    };

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_BLOCK_SIZE];
    loop {
        match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => hasher.update(&buffer[..n]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                tracing::warn!("Error calculating hash for {}: {}", path.display(), e);
                return None;
            }
        }
    }

    Some(hex::encode(hasher.finalize()))
}

/// Decides whether a local file already matches its remote counterpart
///
/// Delegates to the Hub provider's verify-only mode, which never transfers
/// data. Any failure, including I/O trouble, means "not valid".
#[derive(Clone)]
pub struct IntegrityProber {
    hub: Arc<dyn HubProvider>,
    repo_id: String,
    local_root: PathBuf,
}

impl IntegrityProber {
    pub fn new(hub: Arc<dyn HubProvider>, repo_id: &str, local_root: &Path) -> Self {
        Self {
            hub,
            repo_id: repo_id.to_string(),
            local_root: local_root.to_path_buf(),
        }
    }

    pub async fn is_valid(&self, remote_path: &str, local_path: &Path) -> bool {
        if !local_path.exists() {
            tracing::debug!("{} is missing locally", remote_path);
            return false;
        }

        let request = FetchRequest::verify_only(&self.repo_id, remote_path, &self.local_root);
        match self.hub.fetch_file(&request).await {
            Ok(_) => true,
            Err(e) => {
                tracing::debug!("{} needs download: {}", remote_path, e);
                false
            }
        }
    }
}
