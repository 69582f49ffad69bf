//! End-to-end smoke tests against the real `ldvi` binary, in the style of
//! the retrieval pack's `sqruff` CLI test suites: spawn the compiled
//! binary and assert on its exit code and output rather than calling
//! library functions directly.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_exits_successfully_and_documents_the_format_flag() {
    Command::cargo_bin("ldvi")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn version_flag_prints_the_package_version() {
    Command::cargo_bin("ldvi")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ldvi"));
}

#[test]
fn no_directory_backend_fails_with_a_nonzero_exit_code() {
    // This build has no real directory backend wired up (see
    // `src/directory.rs`), so even a well-formed invocation can't complete
    // an edit cycle - it should fail loudly rather than hang or silently
    // succeed.
    Command::cargo_bin("ldvi")
        .unwrap()
        .arg("-b")
        .arg("dc=example,dc=com")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ldvi"));
}

#[test]
fn rejects_an_unknown_binary_mode_value() {
    Command::cargo_bin("ldvi")
        .unwrap()
        .args(["--binary-mode", "bogus"])
        .assert()
        .failure();
}
