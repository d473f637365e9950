use assert_fs::TempDir;
use common::command::{
    branch_tip, commit_file, head_commit_id, init_repository_dir, run_gitlet_command, stdout_of,
};
use common::file::{FileSpec, read_file, write_file};
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

#[rstest]
fn reset_moves_the_branch_and_the_working_area(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_commit_id(dir);
    commit_file(dir, "hello.txt", "second\n", "edit hello");
    commit_file(dir, "extra.txt", "extra\n", "add extra");

    run_gitlet_command(dir, &["reset", &first])
        .assert()
        .success();

    assert_eq!(branch_tip(dir, "master"), first);
    assert_eq!(read_file(&dir.join("hello.txt")), "hello\n");
    assert!(!dir.join("extra.txt").exists());

    let log = stdout_of(run_gitlet_command(dir, &["log"]));
    assert!(!log.contains("add extra"));
}

#[rstest]
fn reset_accepts_an_abbreviated_id_and_clears_staging(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_commit_id(dir);
    commit_file(dir, "hello.txt", "second\n", "edit hello");
    write_file(FileSpec::new(dir.join("staged.txt"), "staged\n".to_string()));
    run_gitlet_command(dir, &["add", "staged.txt"])
        .assert()
        .success();

    run_gitlet_command(dir, &["reset", &first[..6]])
        .assert()
        .success();

    assert_eq!(branch_tip(dir, "master"), first);
    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Staged Files ===\n\n"));
}

#[rstest]
fn reset_to_a_commit_of_another_branch(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .success();
    run_gitlet_command(dir, &["checkout", "feature"])
        .assert()
        .success();
    commit_file(dir, "feature.txt", "feature\n", "on feature");
    let feature_tip = head_commit_id(dir);
    run_gitlet_command(dir, &["checkout", "master"])
        .assert()
        .success();

    run_gitlet_command(dir, &["reset", &feature_tip])
        .assert()
        .success();

    assert_eq!(branch_tip(dir, "master"), feature_tip);
    assert_eq!(read_file(&dir.join("feature.txt")), "feature\n");
}

#[rstest]
fn reset_refuses_to_overwrite_untracked_work(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_commit_id(dir);
    commit_file(dir, "hello.txt", "second\n", "edit hello");
    let second = head_commit_id(dir);
    run_gitlet_command(dir, &["rm", "hello.txt"])
        .assert()
        .success();
    commit_file(dir, "other.txt", "other\n", "drop hello");
    write_file(FileSpec::new(dir.join("hello.txt"), "untracked\n".to_string()));

    run_gitlet_command(dir, &["reset", &first])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("There is an untracked file in the way"));

    assert_ne!(branch_tip(dir, "master"), first);
    assert_ne!(branch_tip(dir, "master"), second);
    assert_eq!(read_file(&dir.join("hello.txt")), "untracked\n");
}

#[rstest]
fn reset_to_unknown_commit_fails(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["reset", "abcdef12"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No commit with that id exists."));
}

#[rstest]
fn reset_to_head_keeps_unsaved_edits(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let head = head_commit_id(dir);
    write_file(FileSpec::new(dir.join("hello.txt"), "unsaved edit\n".to_string()));

    run_gitlet_command(dir, &["reset", &head])
        .assert()
        .success();

    assert_eq!(read_file(&dir.join("hello.txt")), "unsaved edit\n");
}

#[rstest]
fn reset_leaves_files_tracked_identically_alone(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let first = head_commit_id(dir);
    commit_file(dir, "extra.txt", "extra\n", "add extra");
    write_file(FileSpec::new(dir.join("hello.txt"), "unsaved edit\n".to_string()));

    run_gitlet_command(dir, &["reset", &first])
        .assert()
        .success();

    assert_eq!(branch_tip(dir, "master"), first);
    assert_eq!(read_file(&dir.join("hello.txt")), "unsaved edit\n");
    assert!(!dir.join("extra.txt").exists());
}
