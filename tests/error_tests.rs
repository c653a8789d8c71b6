//! Error scenario integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn voice_memo_bin(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("voice-memo").expect("binary builds");
    cmd.env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_STATE_HOME", dir.path().join("state"))
        .env_remove("VOICE_MEMO_STORAGE_TOKEN");
    cmd
}

#[test]
fn remote_storage_without_bucket_fails_fast() {
    let dir = TempDir::new().unwrap();

    voice_memo_bin(&dir)
        .args(["--storage", "remote"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("remote.bucket"));
}

#[test]
fn config_get_unknown_key() {
    let dir = TempDir::new().unwrap();

    voice_memo_bin(&dir)
        .args(["config", "get", "unknown_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown key"));
}

#[test]
fn config_set_unknown_key() {
    let dir = TempDir::new().unwrap();

    voice_memo_bin(&dir)
        .args(["config", "set", "unknown_key", "value"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Valid keys"));
}

#[test]
fn config_set_invalid_storage() {
    let dir = TempDir::new().unwrap();

    voice_memo_bin(&dir)
        .args(["config", "set", "storage", "cloud"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid storage backend"));
}

#[test]
fn config_set_invalid_bool() {
    let dir = TempDir::new().unwrap();

    voice_memo_bin(&dir)
        .args(["config", "set", "autoplay_on_save", "sometimes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'true' or 'false'"));
}

#[test]
fn config_init_twice_fails() {
    let dir = TempDir::new().unwrap();

    voice_memo_bin(&dir).args(["config", "init"]).assert().success();
    voice_memo_bin(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn malformed_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join("config").join("voice-memo");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "storage = ").unwrap();

    voice_memo_bin(&dir)
        .args(["config", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse"));
}
