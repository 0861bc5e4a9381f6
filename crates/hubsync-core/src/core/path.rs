use crate::core::error::{HubsyncError, HubsyncResult};
use std::path::{Path, PathBuf};

/// Directory (relative to a sync root) holding per-file download metadata
pub const DOWNLOAD_METADATA_DIR: &str = ".cache/huggingface/download";

/// Get the Hubsync home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\hubsync
/// - Linux: ~/.config/hubsync
/// - macOS: ~/Library/Application Support/hubsync
pub fn hubsync_home() -> HubsyncResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| HubsyncError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("hubsync"))
}

/// Get the config file path (`<hubsync_home>/config.yaml`)
pub fn config_file() -> HubsyncResult<PathBuf> {
    Ok(hubsync_home()?.join("config.yaml"))
}

/// Get the Hugging Face home directory
///
/// Resolution order: `HF_HOME`, then `$XDG_CACHE_HOME/huggingface`, then
/// `~/.cache/huggingface`. The same location is used on every platform.
pub fn hf_home() -> HubsyncResult<PathBuf> {
    if let Some(dir) = std::env::var_os("HF_HOME") {
        return Ok(PathBuf::from(dir));
    }
    if let Some(dir) = std::env::var_os("XDG_CACHE_HOME") {
        return Ok(PathBuf::from(dir).join("huggingface"));
    }
    let home = dirs::home_dir()
        .ok_or_else(|| HubsyncError::Path("Could not determine home directory".to_string()))?;
    Ok(home.join(".cache").join("huggingface"))
}

/// Get the stored Hugging Face token file path (`<hf_home>/token`)
pub fn hf_token_file() -> HubsyncResult<PathBuf> {
    Ok(hf_home()?.join("token"))
}

/// Join a `/`-separated remote path onto a local root
pub fn local_file_path(local_root: &Path, remote_path: &str) -> PathBuf {
    remote_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .fold(local_root.to_path_buf(), |acc, segment| acc.join(segment))
}

/// Get the download metadata directory for a sync root
pub fn download_metadata_dir(local_root: &Path) -> PathBuf {
    local_file_path(local_root, DOWNLOAD_METADATA_DIR)
}

/// Get the metadata sidecar path recorded for a downloaded file
pub fn metadata_path(local_root: &Path, remote_path: &str) -> PathBuf {
    local_file_path(
        &download_metadata_dir(local_root),
        &format!("{}.metadata", remote_path),
    )
}

/// Get the staging path a partial download of one remote version is written to
///
/// The etag is part of the name, so a partial file is only ever resumed
/// against the version it was started from.
pub fn incomplete_path(local_root: &Path, remote_path: &str, etag: &str) -> PathBuf {
    local_file_path(
        &download_metadata_dir(local_root),
        &format!("{}.{}.incomplete", remote_path, staging_tag(etag)),
    )
}

/// Etag reduced to characters safe in a file name, never empty and dot-free
pub fn staging_tag(etag: &str) -> String {
    let tag: String = etag
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if tag.is_empty() {
        "unknown".to_string()
    } else {
        tag
    }
}

/// Ensure a directory exists, creating it if necessary
///
/// Fails when something other than a directory is in the way.
pub fn ensure_dir(path: &Path) -> HubsyncResult<()> {
    std::fs::create_dir_all(path).map_err(|e| {
        HubsyncError::Path(format!("Cannot create directory {}: {}", path.display(), e))
    })
}

/// Ensure the parent directory of a file exists
pub fn ensure_parent_dir(path: &Path) -> HubsyncResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}
