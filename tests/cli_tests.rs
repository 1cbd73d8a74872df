//! Integration tests for the Stacksmith CLI binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn stacksmith() -> Command {
    Command::cargo_bin("stacksmith").expect("binary builds")
}

#[test]
fn synth_writes_three_templates_and_a_manifest() {
    let out = tempdir().unwrap();

    stacksmith()
        .args(["synth", "--out-dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("vpc.template.json"))
        .stdout(predicate::str::contains("bastion-host.template.json"))
        .stdout(predicate::str::contains("rds.template.json"))
        .stdout(predicate::str::contains("manifest.json"));

    for file in [
        "vpc.template.json",
        "bastion-host.template.json",
        "rds.template.json",
        "manifest.json",
    ] {
        let path = out.path().join(file);
        assert!(path.exists(), "missing {file}");
        let raw = std::fs::read_to_string(&path).unwrap();
        let _: serde_json::Value = serde_json::from_str(&raw).expect("valid JSON");
    }
}

#[test]
fn manifest_records_deploy_order_and_region() {
    let out = tempdir().unwrap();

    stacksmith()
        .args(["synth", "--out-dir"])
        .arg(out.path())
        .assert()
        .success();

    let raw = std::fs::read_to_string(out.path().join("manifest.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&raw).unwrap();

    let stacks = manifest["stacks"].as_array().unwrap();
    let names: Vec<&str> = stacks.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["vpc", "bastion-host", "rds"]);
    for stack in stacks {
        assert_eq!(stack["region"], "ap-northeast-1");
    }
    assert_eq!(
        stacks[2]["dependencies"],
        serde_json::json!(["vpc", "bastion-host"])
    );
}

#[test]
fn list_prints_stacks_in_deploy_order() {
    stacksmith()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"(?s)vpc.*bastion-host.*rds").unwrap())
        .stdout(predicate::str::contains("depends on: vpc, bastion-host"));
}

#[test]
fn missing_explicit_config_file_fails_with_config_exit_code() {
    stacksmith()
        .args(["--config", "/definitely/not/here.toml", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn config_file_can_retarget_the_region() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("stacksmith.toml");
    std::fs::write(&config_path, "[target]\nregion = \"us-west-2\"\n").unwrap();
    let out = dir.path().join("out");

    stacksmith()
        .args(["--config"])
        .arg(&config_path)
        .args(["synth", "--out-dir"])
        .arg(&out)
        .assert()
        .success();

    let raw = std::fs::read_to_string(out.join("bastion-host.template.json")).unwrap();
    assert!(raw.contains("com.amazonaws.us-west-2.ssm"));
    assert!(!raw.contains("ap-northeast-1"));
}
