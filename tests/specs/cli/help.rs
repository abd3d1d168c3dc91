use assert_cmd::Command;

#[test]
fn help_lists_the_core_subcommands() {
    let output = Command::cargo_bin("queuectl").unwrap().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for needle in ["enqueue", "retry", "start", "stop"] {
        assert!(stdout.contains(needle), "--help output missing '{needle}':\n{stdout}");
    }
}

#[test]
fn no_subcommand_is_a_usage_error() {
    Command::cargo_bin("queuectl").unwrap().assert().failure();
}

#[test]
fn get_on_an_unknown_id_fails_with_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::cargo_bin("queuectl")
        .unwrap()
        .arg("--db-path")
        .arg(dir.path().join("queuectl.db"))
        .args(["get", "does-not-exist"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}
