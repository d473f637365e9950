use assert_fs::TempDir;
use common::command::{gitlet_commit, head_commit_id, init_repository_dir, run_gitlet_command};
use common::file::{FileSpec, write_file};
use predicates::prelude::*;
use rstest::rstest;

mod common;

#[rstest]
fn removing_a_tracked_file_deletes_it_and_stages_the_removal(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["rm", "hello.txt"])
        .assert()
        .success();

    assert!(!dir.join("hello.txt").exists());
    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Removed Files ===\nhello.txt\n\n",
        ));

    gitlet_commit(dir, "remove hello").assert().success();
    run_gitlet_command(dir, &["cat-file", &head_commit_id(dir)])
        .assert()
        .success()
        .stdout(predicate::str::contains("hello.txt").not());
}

#[rstest]
fn removing_a_staged_only_file_unstages_it(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("new.txt"), "new\n".to_string()));
    run_gitlet_command(dir, &["add", "new.txt"])
        .assert()
        .success();

    run_gitlet_command(dir, &["rm", "new.txt"])
        .assert()
        .success();

    assert!(dir.join("new.txt").is_file());
    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Staged Files ===\n\n=== Removed Files ===\n\n",
        ))
        .stdout(predicate::str::contains(
            "=== Untracked Files ===\nnew.txt\n",
        ));
}

#[rstest]
fn removing_an_unknown_file_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    write_file(FileSpec::new(dir.join("stray.txt"), "stray\n".to_string()));

    run_gitlet_command(dir, &["rm", "stray.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No reason to remove the file."));
    assert!(dir.join("stray.txt").is_file());
}

#[rstest]
fn adding_back_a_removed_file_cancels_the_removal(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["rm", "hello.txt"])
        .assert()
        .success();

    write_file(FileSpec::new(dir.join("hello.txt"), "hello\n".to_string()));
    run_gitlet_command(dir, &["add", "hello.txt"])
        .assert()
        .success();

    gitlet_commit(dir, "nothing changed")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No changes added to the commit."));
}
