//! Integration tests for the `ikuai-bypass` binary.
//!
//! Only startup paths are covered: every case here exits before the
//! first request to a router.
#![allow(clippy::unwrap_used)]

use std::io::Write;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the binary with `IKUAI_BYPASS_*` overrides cleared.
fn bypass_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("ikuai-bypass");
    cmd.env_remove("IKUAI_BYPASS_CONFIG")
        .env_remove("IKUAI_BYPASS_PASSWORD")
        .env_remove("IKUAI_BYPASS_USERNAME")
        .env_remove("IKUAI_BYPASS_IKUAI_URL")
        .env_remove("IKUAI_BYPASS_CRON")
        .env_remove("RUST_LOG");
    cmd
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    bypass_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("--config")
            .and(predicate::str::contains("--verbose"))
            .and(predicate::str::contains("iKuai")),
    );
}

#[test]
fn test_version_flag() {
    bypass_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_flag_is_usage_error() {
    bypass_cmd().arg("--frobnicate").assert().code(2);
}

// ── Startup failures ────────────────────────────────────────────────

#[test]
fn test_missing_config_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yml");

    bypass_cmd()
        .arg("--config")
        .arg(&path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Could not load configuration"));
}

#[test]
fn test_config_path_from_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("from-env.yml");

    bypass_cmd()
        .env("IKUAI_BYPASS_CONFIG", &path)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("from-env.yml"));
}

#[test]
fn test_invalid_source_url_exits_with_config_code() {
    let file = config_file(
        "username: admin\npassword: admin\ncustom-isp:\n  - name: CN\n    url: not-a-url\n",
    );

    bypass_cmd()
        .arg("-c")
        .arg(file.path())
        .assert()
        .code(3);
}

#[test]
fn test_invalid_cron_exits_with_schedule_code() {
    let file = config_file("username: admin\npassword: admin\ncron: \"every morning\"\n");

    bypass_cmd()
        .arg("-c")
        .arg(file.path())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("every morning"));
}
