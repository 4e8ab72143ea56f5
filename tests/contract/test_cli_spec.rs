use assert_cmd::Command;
use predicates::prelude::*;

/// Contract tests for `install-matrix spec`

#[test]
fn test_spec_plain_package() {
    let mut cmd = Command::cargo_bin("install-matrix").unwrap();
    cmd.arg("spec")
        .assert()
        .success()
        .stdout(predicate::str::contains("pip\tdvc\n"))
        .stdout(predicate::str::contains("poetry\tdvc@latest\n"));
}

#[test]
fn test_spec_with_extras() {
    let mut cmd = Command::cargo_bin("install-matrix").unwrap();
    cmd.args(["spec", "--extras", "s3,ssh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pipx\tdvc[s3,ssh]"))
        .stdout(predicate::str::contains("poetry\tdvc@latest --extras s3 --extras ssh"));
}

#[test]
fn test_spec_with_url_and_revision() {
    let mut cmd = Command::cargo_bin("install-matrix").unwrap();
    cmd.args([
        "spec",
        "--url",
        "git+https://x/y",
        "--rev",
        "abc",
        "--pkg-version",
        "2.0.0",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("pipenv\tgit+https://x/y@abc#egg=dvc\n"))
    .stdout(predicate::str::contains("poetry\tgit+https://x/y#abc\n"));
}

#[test]
fn test_spec_single_installer() {
    let mut cmd = Command::cargo_bin("install-matrix").unwrap();
    cmd.args(["spec", "--installer", "pip", "--pkg-version", "2.0.0"])
        .assert()
        .success()
        .stdout(predicate::str::diff("pip\tdvc==2.0.0\n"));
}
