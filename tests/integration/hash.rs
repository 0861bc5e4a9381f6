//! Tests for `hubsync hash` command

use super::common::hubsync_command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_hash_known_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("hello.txt");
    fs::write(&file, "hello").unwrap();

    hubsync_command()
        .arg("hash")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
        ));
}

#[test]
fn test_hash_missing_file_is_unknown() {
    let temp = TempDir::new().unwrap();

    hubsync_command()
        .arg("hash")
        .arg(temp.path().join("missing.bin"))
        .assert()
        .success()
        .stdout(predicate::str::starts_with("unknown  "));
}

#[test]
fn test_hash_requires_a_file() {
    hubsync_command().arg("hash").assert().failure();
}
