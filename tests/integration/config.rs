//! Tests for `hubsync config` commands

use super::common::TestContext;
use predicates::prelude::*;

#[test]
fn test_config_path_honours_override() {
    let ctx = TestContext::new("http://127.0.0.1:9");

    ctx.hubsync()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.yaml"));
}

#[test]
fn test_config_show_masks_token() {
    let ctx = TestContext::new("http://127.0.0.1:9");
    std::fs::write(
        &ctx.config_path,
        "endpoint: https://hub.example\ntoken: hf_secret\n",
    )
    .unwrap();

    ctx.hubsync()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://hub.example"))
        .stdout(predicate::str::contains("redacted"))
        .stdout(predicate::str::contains("hf_secret").not());
}

#[test]
fn test_config_show_applies_endpoint_override() {
    let ctx = TestContext::new("https://hub.example");

    ctx.hubsync()
        .env("HF_ENDPOINT", "https://mirror.example/")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://mirror.example"))
        .stdout(predicate::str::contains("hub.example").not());
}

#[test]
fn test_invalid_config_reports_help() {
    let ctx = TestContext::new("http://127.0.0.1:9");
    std::fs::write(&ctx.config_path, "endpoint: \"\"\n").unwrap();

    ctx.hubsync()
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("endpoint must not be empty"))
        .stderr(predicate::str::contains("hubsync config path"));
}
