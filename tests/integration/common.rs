//! Common utilities for integration tests

use assert_cmd::Command;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const REPO_ID: &str = "org/model";

/// Isolated environment: its own config file, HF home and model directory
pub struct TestContext {
    pub temp: TempDir,
    pub config_path: PathBuf,
    pub model_dir: PathBuf,
}

impl TestContext {
    pub fn new(endpoint: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let config_path = temp.path().join("config").join("config.yaml");
        fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        fs::write(
            &config_path,
            format!("endpoint: {}\nrevision: main\nrequest_timeout_secs: 5\n", endpoint),
        )
        .unwrap();
        let model_dir = temp.path().join("model");

        Self {
            temp,
            config_path,
            model_dir,
        }
    }

    /// A `hubsync` command that never sees the user's config or token
    pub fn hubsync(&self) -> Command {
        let mut cmd = hubsync_command();
        cmd.current_dir(self.temp.path())
            .env("HUBSYNC_CONFIG", &self.config_path)
            .env("HF_HOME", self.temp.path().join("hf"))
            .env("XDG_CONFIG_HOME", self.temp.path().join("xdg"))
            .env_remove("HF_TOKEN")
            .env_remove("HF_ENDPOINT")
            .env_remove("RUST_LOG");
        cmd
    }

    /// `hubsync sync` against the test repository and model directory
    pub fn sync(&self) -> Command {
        let mut cmd = self.hubsync();
        cmd.arg("sync")
            .arg("--repo-id")
            .arg(REPO_ID)
            .arg("--local-dir")
            .arg(&self.model_dir);
        cmd
    }
}

pub fn hubsync_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hubsync"))
}

/// Serve a listing of `paths` for [`REPO_ID`] at revision `main`
pub async fn mount_listing(server: &MockServer, paths: &[&str]) {
    let siblings: Vec<_> = paths
        .iter()
        .map(|p| serde_json::json!({ "rfilename": p }))
        .collect();
    Mock::given(method("GET"))
        .and(path(format!("/api/models/{}/revision/main", REPO_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": REPO_ID,
            "sha": "c0ffee",
            "siblings": siblings,
        })))
        .mount(server)
        .await;
}

/// Serve metadata and content for one LFS-style file
pub async fn mount_file(server: &MockServer, remote_path: &str, content: &[u8]) {
    let file_path = format!("/{}/resolve/main/{}", REPO_ID, remote_path);
    let sha = hex::encode(Sha256::digest(content));

    Mock::given(method("HEAD"))
        .and(path(file_path.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-repo-commit", "c0ffee")
                .insert_header("x-linked-etag", format!("\"{}\"", sha).as_str())
                .insert_header("x-linked-size", content.len().to_string().as_str()),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(file_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}
