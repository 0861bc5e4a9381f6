//! Download metadata sidecars
//!
//! Every completed download leaves a small text file under
//! `<local_root>/.cache/huggingface/download/` recording what was fetched,
//! in the layout `huggingface_hub` uses for local-dir downloads:
//!
//! ```text
//! <commit hash>
//! <etag>
//! <unix timestamp, fractional seconds>
//! <size in bytes>
//! ```
//!
//! The size line is only written by hubsync; sidecars left by
//! `huggingface_hub` have just the first three lines and are accepted as
//! they are. Verify-only checks compare the local file against the sidecar
//! without touching the network.

use crate::core::path::{ensure_parent_dir, metadata_path};
use crate::core::{HubsyncError, HubsyncResult};
use crate::sync::prober::file_sha256;
use chrono::{DateTime, TimeDelta, Utc};
use std::fs;
use std::path::Path;

/// Slack allowed between the recorded timestamp and the file's mtime
const MTIME_TOLERANCE_SECS: i64 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadMetadata {
    /// Commit the file was resolved at, if the Hub reported one
    pub commit_hash: Option<String>,
    /// Normalized etag (quotes and weak prefix stripped)
    pub etag: String,
    /// Expected size; absent in sidecars written by `huggingface_hub`
    pub size: Option<u64>,
    pub downloaded_at: DateTime<Utc>,
}

impl DownloadMetadata {
    pub fn new(commit_hash: Option<String>, etag: String, size: u64) -> Self {
        Self {
            commit_hash,
            etag,
            size: Some(size),
            downloaded_at: Utc::now(),
        }
    }

    /// Read the sidecar for a remote path, `None` if there is none
    pub fn load(local_root: &Path, remote_path: &str) -> HubsyncResult<Option<Self>> {
        let path = metadata_path(local_root, remote_path);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Self::parse(&content)
            .map(Some)
            .map_err(|reason| {
                HubsyncError::Integrity(format!(
                    "Malformed download metadata {}: {}",
                    path.display(),
                    reason
                ))
            })
    }

    /// Write the sidecar for a remote path
    pub fn save(&self, local_root: &Path, remote_path: &str) -> HubsyncResult<()> {
        let path = metadata_path(local_root, remote_path);
        ensure_parent_dir(&path)?;
        fs::write(&path, self.render())?;
        Ok(())
    }

    fn parse(content: &str) -> Result<Self, String> {
        let mut lines = content.lines().map(str::trim);

        let commit_hash = lines
            .next()
            .filter(|line| !line.is_empty())
            .map(str::to_string);

        // Blank when the Hub reported no etag; the line itself is required
        let etag = lines
            .next()
            .ok_or_else(|| "missing etag".to_string())?
            .to_string();

        let downloaded_at = lines
            .next()
            .and_then(|line| line.parse::<f64>().ok())
            .and_then(datetime_from_secs)
            .ok_or_else(|| "missing or invalid timestamp".to_string())?;

        let size = match lines.next() {
            Some(line) if !line.is_empty() => Some(
                line.parse::<u64>()
                    .map_err(|e| format!("invalid size '{}': {}", line, e))?,
            ),
            _ => None,
        };

        Ok(Self {
            commit_hash,
            etag,
            size,
            downloaded_at,
        })
    }

    fn render(&self) -> String {
        let secs = self.downloaded_at.timestamp_micros() as f64 / 1_000_000.0;
        let mut out = format!(
            "{}\n{}\n{:.6}\n",
            self.commit_hash.as_deref().unwrap_or_default(),
            self.etag,
            secs
        );
        if let Some(size) = self.size {
            out.push_str(&format!("{}\n", size));
        }
        out
    }

    /// Whether the etag is the SHA-256 of the content (LFS objects)
    pub fn etag_is_sha256(&self) -> bool {
        is_sha256_hex(&self.etag)
    }

    /// Check a local file against this record
    ///
    /// The file must not have been modified after the record was written,
    /// the size must match when one was recorded, and when the etag is a
    /// SHA-256 the content hash must match too.
    pub fn verify_file(&self, file: &Path) -> HubsyncResult<()> {
        let file_meta = fs::metadata(file)?;

        if let Ok(modified) = file_meta.modified() {
            let modified = DateTime::<Utc>::from(modified);
            if modified - TimeDelta::seconds(MTIME_TOLERANCE_SECS) > self.downloaded_at {
                return Err(HubsyncError::Integrity(format!(
                    "{} was modified after it was downloaded",
                    file.display()
                )));
            }
        }

        if let Some(expected) = self.size {
            let actual_size = file_meta.len();
            if actual_size != expected {
                return Err(HubsyncError::Integrity(format!(
                    "Size mismatch for {}: expected {} bytes, found {}",
                    file.display(),
                    expected,
                    actual_size
                )));
            }
        }

        if self.etag_is_sha256() {
            let actual = file_sha256(file).ok_or_else(|| {
                HubsyncError::Integrity(format!("Could not hash {}", file.display()))
            })?;
            if !actual.eq_ignore_ascii_case(&self.etag) {
                return Err(HubsyncError::Integrity(format!(
                    "Checksum mismatch for {}:\n  Expected: {}\n  Actual:   {}",
                    file.display(),
                    self.etag,
                    actual
                )));
            }
        }

        Ok(())
    }
}

fn datetime_from_secs(secs: f64) -> Option<DateTime<Utc>> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    let whole = secs.trunc();
    let nanos = ((secs - whole) * 1_000_000_000.0) as u32;
    DateTime::from_timestamp(whole as i64, nanos.min(999_999_999))
}

/// Strip quotes and the weak-validator prefix from an ETag header value
pub fn normalize_etag(raw: &str) -> String {
    raw.trim()
        .trim_start_matches("W/")
        .trim_matches('"')
        .to_string()
}

pub fn is_sha256_hex(value: &str) -> bool {
    value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    fn write_sidecar(root: &Path, remote_path: &str, content: &str) {
        let path = metadata_path(root, remote_path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_normalize_etag() {
        assert_eq!(normalize_etag("\"abc\""), "abc");
        assert_eq!(normalize_etag("W/\"abc\""), "abc");
        assert_eq!(normalize_etag(" abc "), "abc");
    }

    #[test]
    fn test_is_sha256_hex() {
        assert!(is_sha256_hex(HELLO_SHA256));
        assert!(!is_sha256_hex("d41d8cd98f00b204e9800998ecf8427e"));
        assert!(!is_sha256_hex(&"z".repeat(64)));
    }

    #[test]
    fn test_save_writes_text_layout() {
        let temp = TempDir::new().unwrap();
        let meta = DownloadMetadata::new(Some("c0ffee".to_string()), "etag1".to_string(), 5);
        meta.save(temp.path(), "sub/dir/file.bin").unwrap();

        let expected = temp
            .path()
            .join(".cache/huggingface/download/sub/dir/file.bin.metadata");
        let content = std::fs::read_to_string(&expected).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], "c0ffee");
        assert_eq!(lines[1], "etag1");
        assert!(lines[2].parse::<f64>().is_ok());
        assert_eq!(lines[3], "5");

        let loaded = DownloadMetadata::load(temp.path(), "sub/dir/file.bin")
            .unwrap()
            .unwrap();
        assert_eq!(loaded.commit_hash, meta.commit_hash);
        assert_eq!(loaded.etag, meta.etag);
        assert_eq!(loaded.size, Some(5));
        let drift = (loaded.downloaded_at - meta.downloaded_at).num_milliseconds().abs();
        assert!(drift < 1);
    }

    #[test]
    fn test_load_huggingface_hub_sidecar() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("hello.txt"), b"hello").unwrap();
        let written_at = Utc::now().timestamp() + 5;
        write_sidecar(
            temp.path(),
            "hello.txt",
            &format!("c0ffee\n{}\n{}.25\n", HELLO_SHA256, written_at),
        );

        let meta = DownloadMetadata::load(temp.path(), "hello.txt")
            .unwrap()
            .unwrap();
        assert_eq!(meta.commit_hash.as_deref(), Some("c0ffee"));
        assert_eq!(meta.size, None);
        assert_eq!(meta.downloaded_at.timestamp(), written_at);
        assert!(meta.verify_file(&temp.path().join("hello.txt")).is_ok());

        std::fs::write(temp.path().join("hello.txt"), b"jello").unwrap();
        assert!(meta.verify_file(&temp.path().join("hello.txt")).is_err());
    }

    #[test]
    fn test_load_malformed_sidecar() {
        let temp = TempDir::new().unwrap();
        write_sidecar(temp.path(), "a.bin", "c0ffee\n");
        assert!(matches!(
            DownloadMetadata::load(temp.path(), "a.bin"),
            Err(HubsyncError::Integrity(_))
        ));

        write_sidecar(temp.path(), "b.bin", "c0ffee\netag\nyesterday\n");
        assert!(DownloadMetadata::load(temp.path(), "b.bin").is_err());

        write_sidecar(temp.path(), "c.bin", "c0ffee\netag\n1712345678.0\nlots\n");
        assert!(DownloadMetadata::load(temp.path(), "c.bin").is_err());
    }

    #[test]
    fn test_blank_etag_survives_save_and_load() {
        let temp = TempDir::new().unwrap();
        DownloadMetadata::new(None, String::new(), 3)
            .save(temp.path(), "x.bin")
            .unwrap();

        let loaded = DownloadMetadata::load(temp.path(), "x.bin").unwrap().unwrap();
        assert_eq!(loaded.commit_hash, None);
        assert_eq!(loaded.etag, "");
        assert_eq!(loaded.size, Some(3));
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp = TempDir::new().unwrap();
        assert!(DownloadMetadata::load(temp.path(), "nope.bin").unwrap().is_none());
    }

    #[test]
    fn test_verify_file_size_and_hash() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("hello.txt");
        std::fs::write(&file, b"hello").unwrap();

        let good = DownloadMetadata::new(None, HELLO_SHA256.to_string(), 5);
        assert!(good.verify_file(&file).is_ok());

        let wrong_size = DownloadMetadata::new(None, HELLO_SHA256.to_string(), 6);
        assert!(matches!(
            wrong_size.verify_file(&file),
            Err(HubsyncError::Integrity(_))
        ));

        let wrong_hash = DownloadMetadata::new(None, "0".repeat(64), 5);
        assert!(matches!(
            wrong_hash.verify_file(&file),
            Err(HubsyncError::Integrity(_))
        ));
    }

    #[test]
    fn test_verify_file_non_sha_etag_checks_size_only() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.json");
        std::fs::write(&file, b"{}").unwrap();

        let meta = DownloadMetadata::new(None, "a1b2c3".to_string(), 2);
        assert!(meta.verify_file(&file).is_ok());
    }

    #[test]
    fn test_verify_file_modified_after_download() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("config.json");
        std::fs::write(&file, b"{}").unwrap();

        let mut meta = DownloadMetadata::new(None, "a1b2c3".to_string(), 2);
        meta.downloaded_at = Utc::now() - TimeDelta::seconds(60);
        assert!(matches!(
            meta.verify_file(&file),
            Err(HubsyncError::Integrity(_))
        ));
    }
}
