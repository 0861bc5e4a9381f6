//! Hugging Face Hub HTTP client

use crate::core::credentials::Credentials;
use crate::core::path::{ensure_parent_dir, incomplete_path, local_file_path};
use crate::core::{HubsyncError, HubsyncResult};
use crate::di::traits::{ConfigProvider, HubProvider};
use crate::hub::metadata::{normalize_etag, DownloadMetadata};
use crate::hub::types::{ApiErrorBody, FetchRequest, Identity, ModelInfo};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{header, redirect, Client as HttpClient, Response, StatusCode};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

const COMMIT_HEADER: &str = "x-repo-commit";
const LINKED_ETAG_HEADER: &str = "x-linked-etag";
const LINKED_SIZE_HEADER: &str = "x-linked-size";

/// Hub API client
pub struct HubClient {
    /// Follows redirects; used for API calls and file transfers
    http_client: HttpClient,
    /// Never follows redirects, so `x-linked-*` headers on LFS redirects stay visible
    metadata_client: HttpClient,
    endpoint: String,
    revision: String,
    api_timeout: Duration,
    credentials: Option<Credentials>,
}

/// What the Hub reports about a file before it is transferred
#[derive(Debug, Clone, Default)]
struct RemoteFileInfo {
    commit_hash: Option<String>,
    etag: Option<String>,
    size: Option<u64>,
}

impl HubClient {
    /// Create a new Hub client
    ///
    /// `credentials` of `None` means anonymous access.
    pub fn new(
        config: &dyn ConfigProvider,
        credentials: Option<Credentials>,
    ) -> HubsyncResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(config.user_agent())
                .map_err(|e| HubsyncError::Config(format!("Invalid user agent: {}", e)))?,
        );

        if let Some(ref creds) = credentials {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", creds.token()))
                .map_err(|e| HubsyncError::Config(format!("Invalid access token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let http_client = HttpClient::builder()
            .default_headers(headers.clone())
            .connect_timeout(config.request_timeout())
            .build()
            .map_err(|e| HubsyncError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let metadata_client = HttpClient::builder()
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| HubsyncError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            metadata_client,
            endpoint: config.endpoint(),
            revision: config.revision().to_string(),
            api_timeout: config.request_timeout(),
            credentials,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// URL that resolves a file at the configured revision
    pub fn file_url(&self, repo_id: &str, remote_path: &str) -> String {
        let encoded_path = remote_path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/{}/resolve/{}/{}",
            self.endpoint,
            repo_id,
            urlencoding::encode(&self.revision),
            encoded_path
        )
    }

    /// Fetch model information for a repository at the configured revision
    pub async fn model_info(&self, repo_id: &str) -> HubsyncResult<ModelInfo> {
        let url = format!(
            "{}/api/models/{}/revision/{}",
            self.endpoint,
            repo_id,
            urlencoding::encode(&self.revision)
        );
        tracing::debug!("Listing {}", url);

        let response = self
            .http_client
            .get(&url)
            .timeout(self.api_timeout)
            .send()
            .await
            .map_err(|e| HubsyncError::Listing(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(HubsyncError::Listing(
                describe_failure(repo_id, response).await,
            ));
        }

        response
            .json::<ModelInfo>()
            .await
            .map_err(|e| HubsyncError::Listing(format!("Invalid listing for {}: {}", repo_id, e)))
    }

    /// Check a local copy against its download metadata
    async fn verify_local(&self, request: &FetchRequest) -> HubsyncResult<PathBuf> {
        let local_path = local_file_path(&request.local_root, &request.remote_path);
        if !local_path.is_file() {
            return Err(HubsyncError::Transfer(format!(
                "{} is not available locally",
                request.remote_path
            )));
        }

        let metadata = DownloadMetadata::load(&request.local_root, &request.remote_path)?
            .ok_or_else(|| {
                HubsyncError::Integrity(format!(
                    "No download metadata recorded for {}",
                    request.remote_path
                ))
            })?;

        verify_blocking(metadata, local_path.clone()).await?;
        Ok(local_path)
    }

    /// HEAD the resolve URL without following redirects
    async fn remote_file_info(
        &self,
        repo_id: &str,
        remote_path: &str,
    ) -> HubsyncResult<RemoteFileInfo> {
        let url = self.file_url(repo_id, remote_path);
        let response = self
            .metadata_client
            .head(&url)
            .send()
            .await
            .map_err(|e| HubsyncError::Transfer(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !(status.is_success() || status.is_redirection()) {
            return Err(HubsyncError::Transfer(
                describe_failure(remote_path, response).await,
            ));
        }

        let headers = response.headers();
        let header_str = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let etag = header_str(LINKED_ETAG_HEADER)
            .or_else(|| header_str(header::ETAG.as_str()))
            .map(|e| normalize_etag(&e));

        // A redirect's own Content-Length describes the redirect body
        let size = header_str(LINKED_SIZE_HEADER)
            .or_else(|| {
                status
                    .is_success()
                    .then(|| header_str(header::CONTENT_LENGTH.as_str()))
                    .flatten()
            })
            .and_then(|s| s.trim().parse::<u64>().ok());

        Ok(RemoteFileInfo {
            commit_hash: header_str(COMMIT_HEADER),
            etag,
            size,
        })
    }

    /// Download a file into the sync root, resuming a partial transfer when allowed
    async fn download(&self, request: &FetchRequest) -> HubsyncResult<PathBuf> {
        let remote_path = request.remote_path.as_str();
        let local_path = local_file_path(&request.local_root, remote_path);
        let info = self.remote_file_info(&request.repo_id, remote_path).await?;

        if !request.force_refresh && local_path.is_file() {
            if let Ok(Some(existing)) = DownloadMetadata::load(&request.local_root, remote_path) {
                let same_etag = info.etag.as_deref() == Some(existing.etag.as_str());
                if same_etag && verify_blocking(existing, local_path.clone()).await.is_ok() {
                    tracing::debug!("{} is already up to date", remote_path);
                    return Ok(local_path);
                }
            }
        }

        let staging = incomplete_path(
            &request.local_root,
            remote_path,
            info.etag.as_deref().unwrap_or_default(),
        );
        ensure_parent_dir(&staging)?;
        remove_stale_partials(&staging, remote_path).await?;

        // Without an etag there is no telling which version a partial file holds
        let mut resume_from = if request.allow_resume && info.etag.is_some() {
            tokio::fs::metadata(&staging)
                .await
                .map(|m| m.len())
                .unwrap_or(0)
        } else {
            0
        };
        if matches!(info.size, Some(size) if resume_from > size) {
            resume_from = 0;
        }
        if resume_from == 0 {
            remove_if_exists(&staging).await?;
        }

        let already_complete = resume_from > 0 && info.size == Some(resume_from);
        if already_complete {
            tracing::debug!("{} staging file is complete; skipping transfer", remote_path);
        } else {
            let url = self.file_url(&request.repo_id, remote_path);
            self.transfer(&url, remote_path, &staging, resume_from)
                .await?;
        }

        let size = tokio::fs::metadata(&staging).await?.len();
        let metadata = DownloadMetadata::new(
            info.commit_hash.clone(),
            info.etag.clone().unwrap_or_default(),
            info.size.unwrap_or(size),
        );

        if let Err(e) = verify_blocking(metadata.clone(), staging.clone()).await {
            // Corrupt data must not be resumed from
            remove_if_exists(&staging).await?;
            return Err(e);
        }

        ensure_parent_dir(&local_path)?;
        remove_if_exists(&local_path).await?;
        tokio::fs::rename(&staging, &local_path).await?;
        metadata.save(&request.local_root, remote_path)?;

        Ok(local_path)
    }

    /// Stream the file body into the staging file
    async fn transfer(
        &self,
        url: &str,
        remote_path: &str,
        staging: &Path,
        mut resume_from: u64,
    ) -> HubsyncResult<()> {
        let mut response = self.open_transfer(url, resume_from).await?;

        if resume_from > 0 && response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            tracing::debug!(
                "Server rejected resume of {} at byte {}; restarting",
                remote_path,
                resume_from
            );
            remove_if_exists(staging).await?;
            resume_from = 0;
            response = self.open_transfer(url, 0).await?;
        }

        if !response.status().is_success() {
            return Err(HubsyncError::Transfer(
                describe_failure(remote_path, response).await,
            ));
        }

        let append = resume_from > 0 && response.status() == StatusCode::PARTIAL_CONTENT;
        if append {
            tracing::info!("Resuming {} from byte {}", remote_path, resume_from);
        } else if resume_from > 0 {
            tracing::debug!("Server ignored range request for {}; restarting", remote_path);
        }

        let mut file = if append {
            tokio::fs::OpenOptions::new()
                .append(true)
                .open(staging)
                .await?
        } else {
            tokio::fs::File::create(staging).await?
        };

        let offset = if append { resume_from } else { 0 };
        let mut written: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| {
                HubsyncError::Transfer(format!(
                    "Download of {} interrupted after {} bytes: {}",
                    remote_path,
                    offset + written,
                    e
                ))
            })?;
            file.write_all(&bytes).await?;
            written += bytes.len() as u64;
        }
        file.flush().await?;

        tracing::debug!("Wrote {} bytes of {}", written, remote_path);
        Ok(())
    }

    async fn open_transfer(&self, url: &str, resume_from: u64) -> HubsyncResult<Response> {
        let mut builder = self.http_client.get(url);
        if resume_from > 0 {
            builder = builder.header(header::RANGE, format!("bytes={}-", resume_from));
        }
        builder
            .send()
            .await
            .map_err(|e| HubsyncError::Transfer(format!("Request to {} failed: {}", url, e)))
    }
}

#[async_trait]
impl HubProvider for HubClient {
    async fn list_files(&self, repo_id: &str) -> HubsyncResult<Vec<String>> {
        let info = self.model_info(repo_id).await?;
        Ok(info.siblings.into_iter().map(|s| s.rfilename).collect())
    }

    async fn fetch_file(&self, request: &FetchRequest) -> HubsyncResult<PathBuf> {
        if request.local_only {
            self.verify_local(request).await
        } else {
            self.download(request).await
        }
    }

    async fn whoami(&self) -> HubsyncResult<Identity> {
        if self.credentials.is_none() {
            return Err(HubsyncError::Auth("No access token provided".to_string()));
        }

        let url = format!("{}/api/whoami-v2", self.endpoint);
        let response = self
            .http_client
            .get(&url)
            .timeout(self.api_timeout)
            .send()
            .await
            .map_err(|e| HubsyncError::Auth(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(HubsyncError::Auth(describe_failure("token", response).await));
        }

        response
            .json::<Identity>()
            .await
            .map_err(|e| HubsyncError::Auth(format!("Invalid whoami response: {}", e)))
    }
}

/// Build a readable message from a failed response
async fn describe_failure(subject: &str, response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string());

    let reason = match status {
        StatusCode::UNAUTHORIZED => "authentication required",
        StatusCode::FORBIDDEN => "access denied",
        StatusCode::NOT_FOUND => "not found",
        _ => "request failed",
    };

    if detail.is_empty() {
        format!("{}: {} (HTTP {})", subject, reason, status.as_u16())
    } else {
        format!("{}: {} (HTTP {}): {}", subject, reason, status.as_u16(), detail)
    }
}

/// Hashing large files blocks; keep it off the async workers
async fn verify_blocking(metadata: DownloadMetadata, file: PathBuf) -> HubsyncResult<()> {
    tokio::task::spawn_blocking(move || metadata.verify_file(&file))
        .await
        .map_err(|e| HubsyncError::Integrity(format!("Verification task failed: {}", e)))?
}

/// Delete partial downloads of other versions of the same remote file
async fn remove_stale_partials(staging: &Path, remote_path: &str) -> HubsyncResult<()> {
    let Some(dir) = staging.parent() else {
        return Ok(());
    };
    let file_name = remote_path.rsplit('/').next().unwrap_or(remote_path);
    let prefix = format!("{}.", file_name);

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path == staging {
            continue;
        }
        let name = entry.file_name();
        let name = name.to_string_lossy();
        // Staging tags never contain dots, so longer names sharing the prefix are other files
        let other_version = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".incomplete"))
            .is_some_and(|tag| !tag.is_empty() && !tag.contains('.'));
        if other_version {
            tracing::debug!("Discarding partial download {}", path.display());
            remove_if_exists(&path).await?;
        }
    }
    Ok(())
}

async fn remove_if_exists(path: &Path) -> HubsyncResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
