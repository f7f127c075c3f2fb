#![allow(deprecated)] // TODO: cargo_bin → cargo_bin_cmd! へ移行

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

/// CLIヘルプが正しく表示されることを確認
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("settle").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("落ち着くまで待つ"))
        .stdout(predicate::str::contains("fleet"))
        .stdout(predicate::str::contains("kafka"))
        .stdout(predicate::str::contains("ssm"))
        .stdout(predicate::str::contains("--timeout"));
}

/// バージョン表示が正しく動作することを確認
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("settle").unwrap();
    cmd.arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("settle"));
}

#[test]
fn test_kafka_help() {
    let mut cmd = Command::cargo_bin("settle").unwrap();
    cmd.arg("kafka")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("wait-created"))
        .stdout(predicate::str::contains("wait-deleted"))
        .stdout(predicate::str::contains("wait-operation"))
        .stdout(predicate::str::contains("delete-configuration"));
}

#[test]
fn test_ssm_params_help() {
    let mut cmd = Command::cargo_bin("settle").unwrap();
    cmd.args(["ssm", "params", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<PATH>"))
        .stdout(predicate::str::contains("--no-decrypt"));
}

#[test]
fn test_fleet_delete_requires_name() {
    let mut cmd = Command::cargo_bin("settle").unwrap();
    cmd.args(["fleet", "delete"]).assert().failure();
}

/// 設定ファイルの値とフラグの上書きが反映されることを確認
#[test]
fn test_config_show() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settle.yaml");
    fs::write(&path, "region: us-east-1\ntimeouts:\n  fleet_operation: 120\n").unwrap();

    let mut cmd = Command::cargo_bin("settle").unwrap();
    cmd.current_dir(dir.path())
        .env("AWS_EC2_METADATA_DISABLED", "true")
        .args(["config", "show", "--region", "ap-northeast-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("region: ap-northeast-1"))
        .stdout(predicate::str::contains("fleet_operation: 120"));
}

#[test]
fn test_missing_config_file() {
    let dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("settle").unwrap();
    cmd.args(["config", "show", "--config"])
        .arg(dir.path().join("missing.yaml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
