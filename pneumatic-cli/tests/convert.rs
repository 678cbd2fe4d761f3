use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn convert_markdown_to_html() {
    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("convert")
        .arg(fixture_path("onboarding.md"))
        .arg("--to")
        .arg("html");

    let output_pred = predicate::str::contains("<h2>Onboarding</h2>")
        .and(predicate::str::contains(
            r#"<ul class="checklist" data-list-api-name="setup">"#,
        ))
        .and(predicate::str::contains(r#"data-item-api-name="laptop""#))
        .and(predicate::str::contains(r#"data-mention-id="12">@Ann</span>"#));

    cmd.assert().success().stdout(output_pred);
}

#[test]
fn convert_is_the_default_command() {
    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg(fixture_path("onboarding.md")).arg("--to").arg("json");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(r#""type": "checklist""#));
}

#[test]
fn convert_writes_output_file() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("out.md");

    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("convert")
        .arg(fixture_path("glued.md"))
        .arg("--to")
        .arg("markdown")
        .arg("-o")
        .arg(&output);
    cmd.assert().success();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(
        written,
        "Before the list\n\n[clist:L|a]first[/clist]\n[clist:L|b]second[/clist]"
    );
}

#[test]
fn html_cannot_be_a_source_format() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("page.html");
    fs::write(&input, "<p>hi</p>").unwrap();

    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("convert").arg(&input).arg("--to").arg("markdown");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("does not support parsing"));
}

#[test]
fn unknown_extension_requires_from() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "hi").unwrap();

    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("convert").arg(&input).arg("--to").arg("json");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("specify --from explicitly"));
}

#[test]
fn list_formats_shows_capabilities() {
    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("--list-formats");
    cmd.assert().success().stdout(
        predicate::str::contains("markdown")
            .and(predicate::str::contains("parse+serialize"))
            .and(predicate::str::contains(".html, .htm")),
    );
}
