//! Tests for `hubsync plan` command

use super::common::{mount_file, mount_listing, TestContext, REPO_ID};
use predicates::prelude::*;
use wiremock::MockServer;

#[tokio::test(flavor = "multi_thread")]
async fn test_plan_lists_without_downloading() {
    let server = MockServer::start().await;
    mount_listing(&server, &["a.safetensors", "b.json", "sub/c.safetensors"]).await;
    let ctx = TestContext::new(&server.uri());

    ctx.hubsync()
        .arg("plan")
        .arg("--repo-id")
        .arg(REPO_ID)
        .arg("--local-dir")
        .arg(&ctx.model_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Would download:"))
        .stdout(predicate::str::contains("a.safetensors ->"))
        .stdout(predicate::str::contains("sub/c.safetensors ->"))
        .stdout(predicate::str::contains("b.json").not());

    assert!(!ctx.model_dir.exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_plan_after_sync_is_empty() {
    let server = MockServer::start().await;
    mount_listing(&server, &["a.safetensors"]).await;
    mount_file(&server, "a.safetensors", b"weights").await;
    let ctx = TestContext::new(&server.uri());

    ctx.sync().arg("--no-auth").assert().success();

    ctx.hubsync()
        .arg("plan")
        .arg("--repo-id")
        .arg(REPO_ID)
        .arg("--local-dir")
        .arg(&ctx.model_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "✓ All files are already downloaded and valid!",
        ));
}
