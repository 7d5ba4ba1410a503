//! End-to-end tests that create real commits.
//!
//! These need a `git` binary and are only run with
//! `cargo test --features integration-tests`.

mod common;
use common::prelude::*;

fn camera_fixture(ledger: &str) -> TestFixture {
    let fixture = TestFixture::new()
        .with_camera_tree()
        .with_ledger(ledger);
    fixture.init_git_repo("frameworks/base");
    fixture.init_git_repo("vendor/mtk");
    fixture
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_commit_creates_one_commit_per_plan() {
    let fixture = camera_fixture(ledgers::MULTI_REPO);
    fixture
        .child("frameworks/base/core/Camera.java")
        .write_str("class Camera { int fixed; }\n")
        .unwrap();
    fixture
        .child("frameworks/base/media/Codec.java")
        .write_str("class Codec { int fixed; }\n")
        .unwrap();
    fixture
        .child("vendor/mtk/codec.c")
        .write_str("int codec = 1;\n")
        .unwrap();

    fixture
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Commit created."))
        // vendor/mtk/camera.c is unchanged
        .stdout(predicate::str::contains(
            "[INFO] No staged changes, skip commit.",
        ))
        .stdout(predicate::str::contains(
            "Done: 3 committed, 1 unchanged, 0 missing directories, 0 failed",
        ));

    let log = fixture.git("frameworks/base", &["log", "--format=%s"]);
    let subjects: Vec<&str> = log.lines().collect();
    assert_eq!(
        subjects,
        vec![
            "[P27][ALPS300] [Google Security Patch] Null pointer fix [1/2]",
            "[P27][ALPS100][ALPS200] Fix camera crash",
            "initial",
        ]
    );

    let vendor_log = fixture.git("vendor/mtk", &["log", "-1", "--format=%s"]);
    assert_eq!(
        vendor_log.trim(),
        "[P27][ALPS300] [Google Security Patch] Null pointer fix [2/2]"
    );
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_commit_body_matches_dry_run_preview() {
    let fixture = camera_fixture(ledgers::SINGLE);
    fixture
        .child("frameworks/base/core/Camera.java")
        .write_str("class Camera { int fixed; }\n")
        .unwrap();

    let preview = fixture.command().arg("--dry-run").output().unwrap();
    let preview = String::from_utf8(preview.stdout).unwrap();

    fixture.command().assert().success();

    let message = fixture.git("frameworks/base", &["log", "-1", "--format=%B"]);
    assert!(
        preview.contains(message.trim_end()),
        "committed message not in preview:\n{}",
        message
    );
    assert!(message.contains("CR ID:\n  ALPS100\n"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_commit_is_idempotent() {
    let fixture = camera_fixture(ledgers::SINGLE);
    fixture
        .child("frameworks/base/core/Camera.java")
        .write_str("class Camera { int fixed; }\n")
        .unwrap();

    fixture
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("Done: 1 committed"));
    fixture
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains("Done: 0 committed, 1 unchanged"));
}

#[test]
#[cfg_attr(not(feature = "integration-tests"), ignore)]
fn test_commit_missing_file_still_commits_the_rest() {
    let fixture = camera_fixture(ledgers::MULTI_REPO);
    fixture
        .child("frameworks/base/core/Camera.java")
        .write_str("class Camera { int fixed; }\n")
        .unwrap();
    std::fs::remove_file(fixture.path().join("vendor/mtk/codec.c")).unwrap();
    std::fs::write(fixture.path().join("vendor/mtk/camera.c"), "int camera = 2;\n").unwrap();

    fixture
        .command()
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "[WARN] File not found, skip add: vendor/mtk/codec.c",
        ));

    let vendor_log = fixture.git("vendor/mtk", &["log", "-1", "--format=%s"]);
    assert_eq!(vendor_log.trim(), "[P27][ALPS100] Fix camera crash");
}
