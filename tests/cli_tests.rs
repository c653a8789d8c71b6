//! CLI integration tests

use std::process::Command;

use tempfile::TempDir;

fn voice_memo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_voice-memo"))
}

/// Binary with config and state directories pointed at a scratch dir
fn isolated(dir: &TempDir) -> Command {
    let mut cmd = voice_memo_bin();
    cmd.env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path().join("config"))
        .env("XDG_STATE_HOME", dir.path().join("state"));
    cmd
}

#[test]
fn help_output() {
    let output = voice_memo_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice memos"));
    assert!(stdout.contains("--storage"));
    assert!(stdout.contains("--document-dir"));
    assert!(stdout.contains("--autoplay"));
    assert!(stdout.contains("--ignore-permission"));
    assert!(stdout.contains("--quality"));
}

#[test]
fn version_output() {
    let output = voice_memo_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice-memo"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let dir = TempDir::new().unwrap();
    let output = isolated(&dir)
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice-memo"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_help() {
    let output = voice_memo_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn config_init_set_get_list() {
    let dir = TempDir::new().unwrap();

    let init = isolated(&dir).args(["config", "init"]).output().unwrap();
    assert!(init.status.success());

    let set = isolated(&dir)
        .args(["config", "set", "remote.bucket", "memos.appspot.com"])
        .output()
        .unwrap();
    assert!(set.status.success());

    let get = isolated(&dir)
        .args(["config", "get", "remote.bucket"])
        .output()
        .unwrap();
    assert!(get.status.success());
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "memos.appspot.com");

    let list = isolated(&dir).args(["config", "list"]).output().unwrap();
    assert!(list.status.success());
    let stdout = String::from_utf8_lossy(&list.stdout);
    assert!(stdout.contains("storage"));
    assert!(stdout.contains("local"));
    assert!(stdout.contains("require_permission"));
}

#[test]
fn config_get_unset_key() {
    let dir = TempDir::new().unwrap();
    let output = isolated(&dir)
        .args(["config", "get", "remote.token"])
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("(not set)"));
}

#[test]
fn invalid_storage_flag() {
    let output = voice_memo_bin()
        .args(["--storage", "cloud"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value") || stderr.contains("cloud"),
        "Expected error about invalid storage, got: {}",
        stderr
    );
}
