//! Tests for `hubsync sync` command

use super::common::{mount_file, mount_listing, TestContext, REPO_ID};
use predicates::prelude::*;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_downloads_filtered_files() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[".gitattributes", "a.safetensors", "b.json", "a.safetensors"],
    )
    .await;
    mount_file(&server, "a.safetensors", b"weights").await;
    let ctx = TestContext::new(&server.uri());

    ctx.sync()
        .arg("--no-auth")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 4 files in repository"))
        .stdout(predicate::str::contains("Checking 1 files after filtering"))
        .stdout(predicate::str::contains("Found 1 files to download"))
        .stdout(predicate::str::contains("✓ Downloaded: a.safetensors ->"))
        .stdout(predicate::str::contains("Failed:         0"));

    assert_eq!(
        fs::read(ctx.model_dir.join("a.safetensors")).unwrap(),
        b"weights"
    );
    assert!(!ctx.model_dir.join("b.json").exists());
    assert!(!ctx.model_dir.join(".gitattributes").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_second_sync_has_nothing_to_do() {
    let server = MockServer::start().await;
    mount_listing(&server, &["vae/model.safetensors"]).await;
    mount_file(&server, "vae/model.safetensors", b"vae weights").await;
    let ctx = TestContext::new(&server.uri());

    ctx.sync().arg("--no-auth").assert().success();

    ctx.sync()
        .arg("--no-auth")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 files to download"))
        .stdout(predicate::str::contains(
            "✓ All files are already downloaded and valid!",
        ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_sync_replaces_corrupted_file() {
    let server = MockServer::start().await;
    mount_listing(&server, &["a.safetensors"]).await;
    mount_file(&server, "a.safetensors", b"good weights").await;
    let ctx = TestContext::new(&server.uri());

    ctx.sync().arg("--no-auth").assert().success();
    fs::write(ctx.model_dir.join("a.safetensors"), b"bad weights!").unwrap();

    ctx.sync()
        .arg("--no-auth")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 files to download"));
    assert_eq!(
        fs::read(ctx.model_dir.join("a.safetensors")).unwrap(),
        b"good weights"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_download_exits_nonzero_after_summary() {
    let server = MockServer::start().await;
    mount_listing(&server, &["a.safetensors", "b.safetensors", "c.safetensors"]).await;
    mount_file(&server, "a.safetensors", b"a").await;
    mount_file(&server, "c.safetensors", b"c").await;
    Mock::given(method("HEAD"))
        .and(path(format!("/{}/resolve/main/b.safetensors", REPO_ID)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let ctx = TestContext::new(&server.uri());

    ctx.sync()
        .arg("--no-auth")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("✗ Failed to download b.safetensors"))
        .stdout(predicate::str::contains("Downloaded:     2"))
        .stdout(predicate::str::contains("Failed:         1"))
        .stderr(predicate::str::contains("1 file(s) failed to download"));

    assert!(ctx.model_dir.join("a.safetensors").exists());
    assert!(ctx.model_dir.join("c.safetensors").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_listing_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/api/models/{}/revision/main", REPO_ID)))
        .respond_with(
            ResponseTemplate::new(404).set_body_string(r#"{"error":"Repository not found"}"#),
        )
        .mount(&server)
        .await;
    let ctx = TestContext::new(&server.uri());

    ctx.sync()
        .arg("--no-auth")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to list repository files"))
        .stderr(predicate::str::contains("Repository not found"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_auth_failure_only_warns() {
    let server = MockServer::start().await;
    mount_listing(&server, &["a.safetensors"]).await;
    mount_file(&server, "a.safetensors", b"a").await;
    let ctx = TestContext::new(&server.uri());

    ctx.sync()
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "⚠️ Authentication failed or not provided",
        ))
        .stdout(predicate::str::contains("Continuing anyway..."))
        .stdout(predicate::str::contains("✓ Downloaded: a.safetensors"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_parallel_sync_with_custom_patterns() {
    let server = MockServer::start().await;
    mount_listing(
        &server,
        &[
            "transformer/model-1.safetensors",
            "transformer/model-2.safetensors",
            "text_encoder/model.safetensors",
            "vae/config.json",
        ],
    )
    .await;
    mount_file(&server, "transformer/model-1.safetensors", b"one").await;
    mount_file(&server, "transformer/model-2.safetensors", b"two").await;
    mount_file(&server, "vae/config.json", b"{}").await;
    let ctx = TestContext::new(&server.uri());

    ctx.sync()
        .args(["--no-auth", "--jobs", "2", "--quiet"])
        .args(["--include", "*.safetensors", "*.json"])
        .args(["--exclude", "text_encoder/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Downloaded:     3"))
        .stdout(predicate::str::contains("Found 3 files").not());

    assert!(ctx.model_dir.join("transformer/model-2.safetensors").exists());
    assert!(ctx.model_dir.join("vae/config.json").exists());
    assert!(!ctx.model_dir.join("text_encoder").exists());
}
