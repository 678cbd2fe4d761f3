use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn config_file_disables_checklist_normalization() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("doc.md");
    fs::write(&input_path, "[clist:L|a]x[/clist]\n").unwrap();

    let config_path = dir.path().join("pneumatic.toml");
    fs::write(&config_path, "[markdown]\nnormalize_checklists = false\n").unwrap();

    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("decode")
        .arg(input_path.as_os_str())
        .arg("--config")
        .arg(config_path.as_os_str());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""item_api_name": "a""#));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("doc.md");
    fs::write(&input_path, "x").unwrap();

    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("decode")
        .arg(input_path.as_os_str())
        .arg("--config")
        .arg(dir.path().join("missing.toml").as_os_str());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn invalid_extra_boolean_is_rejected() {
    let dir = tempdir().unwrap();
    let input_path = dir.path().join("doc.md");
    fs::write(&input_path, "x").unwrap();

    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("decode")
        .arg(input_path.as_os_str())
        .arg("--extra-normalize-checklists")
        .arg("maybe");
    cmd.assert().failure().stderr(predicate::str::contains(
        "Invalid boolean value 'maybe' for --extra-normalize-checklists",
    ));
}
