use assert_cmd::Command;

#[test]
fn cli_help_runs() {
    let mut cmd = Command::cargo_bin("emotion-lens").expect("binary exists");
    cmd.arg("--help").assert().success();
}

#[test]
fn normalize_command_prints_cleaned_text() {
    let mut cmd = Command::cargo_bin("emotion-lens").expect("binary exists");
    cmd.args(["normalize", "I had a wonderful day today, everything went so well!"])
        .assert()
        .success()
        .stdout("wonderful day today everything went well\n");
}

#[test]
fn predict_without_artifacts_fails() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("emotion-lens").expect("binary exists");
    cmd.args(["predict", "hello there", "--artifacts"])
        .arg(dir.path())
        .assert()
        .failure();
}
