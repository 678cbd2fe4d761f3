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
fn tokens_lists_runs_with_resolved_titles() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("comment.txt");
    fs::write(&input, "Hi {{first_name}} [Ann|12]").unwrap();

    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("tokens")
        .arg(&input)
        .arg("--variables")
        .arg(fixture_path("variables.json"));

    cmd.assert().success().stdout(
        predicate::str::contains(r#"title="First name" subtitle="Kickoff form""#)
            .and(predicate::str::contains(r#"id=12 name="Ann""#)),
    );
}

#[test]
fn tokens_keeps_bad_mentions_as_text() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("comment.txt");
    fs::write(&input, "[Alice|notanumber]").unwrap();

    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("tokens").arg(&input);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("text ").and(predicate::str::contains("mention").not()));
}

#[test]
fn invalid_variables_file_fails() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("comment.txt");
    let variables = dir.path().join("vars.json");
    fs::write(&input, "{{x}}").unwrap();
    fs::write(&variables, "{\"not\": \"a list\"}").unwrap();

    let mut cmd = cargo_bin_cmd!("pneumatic");
    cmd.arg("tokens").arg(&input).arg("--variables").arg(&variables);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid variables file"));
}
