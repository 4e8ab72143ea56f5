use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Contract tests for `install-matrix list`

fn install_matrix() -> Command {
    let mut cmd = Command::cargo_bin("install-matrix").unwrap();
    for var in [
        "INSTALL_MATRIX_URL",
        "INSTALL_MATRIX_INSTALLER",
        "INSTALL_MATRIX_EXTRAS",
        "INSTALL_MATRIX_PKG_VERSION",
        "INSTALL_MATRIX_REV",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_list_default_matrix() {
    install_matrix()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("pip-none\trun"))
        .stdout(predicate::str::contains("pipx-webdav\trun"))
        .stdout(predicate::str::contains("pipenv-all\trun"))
        .stdout(predicate::str::contains("44 of 44 cases selected"));
}

#[test]
fn test_list_with_filters() {
    install_matrix()
        .args(["list", "--installer", "poetry", "--extras", "s3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("poetry-s3\trun"))
        .stdout(predicate::str::contains("pip-s3\tskip (skipping installer 'pip')"))
        .stdout(predicate::str::contains("poetry-gs\tskip (skipping extras 'gs')"))
        .stdout(predicate::str::contains("1 of 44 cases selected"));
}

#[test]
fn test_list_extras_none_selects_plain_install() {
    install_matrix()
        .args(["list", "--extras", "None"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pipx-none\trun"))
        .stdout(predicate::str::contains("4 of 44 cases selected"));
}

#[test]
fn test_list_filters_from_environment() {
    install_matrix()
        .arg("list")
        .env("INSTALL_MATRIX_INSTALLER", "pipenv")
        .assert()
        .success()
        .stdout(predicate::str::contains("11 of 44 cases selected"));
}

#[test]
fn test_list_from_matrix_file() {
    let temp_dir = TempDir::new().unwrap();
    let matrix = temp_dir.path().join("matrix.toml");
    fs::write(
        &matrix,
        r#"
package = "requests"
installers = ["pip", "pipx"]
extras = ["none", "socks"]
"#,
    )
    .unwrap();

    install_matrix()
        .args(["list", "--json", "--matrix"])
        .arg(&matrix)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"case\": \"pipx-socks\""))
        .stdout(predicate::str::contains("\"spec\": \"requests[socks]\""));
}

#[test]
fn test_list_json_is_valid() {
    let output = install_matrix()
        .args(["list", "--json", "--installer", "pip"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let cases: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let cases = cases.as_array().unwrap();
    assert_eq!(cases.len(), 44);
    assert_eq!(cases[0]["case"], "pip-none");
    assert!(cases[0]["skip"].is_null());
    assert_eq!(cases[11]["skip"], "skipping installer 'pipx'");
}

#[test]
fn test_list_missing_matrix_file() {
    let temp_dir = TempDir::new().unwrap();
    install_matrix()
        .args(["list", "--matrix"])
        .arg(temp_dir.path().join("missing.toml"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Matrix file not found"));
}

#[test]
fn test_list_rejects_unknown_installer() {
    install_matrix()
        .args(["list", "--installer", "conda"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown installer 'conda'"));
}
