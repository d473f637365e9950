use assert_fs::TempDir;
use common::command::{
    branch_tip, commit_file, current_branch, head_commit_id, init_repository_dir,
    run_gitlet_command,
};
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

#[rstest]
fn create_branch_at_the_current_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .success();

    assert_eq!(branch_tip(dir, "feature"), head_commit_id(dir));
    assert_eq!(current_branch(dir), "master");
}

#[rstest]
fn create_hierarchical_branch(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();

    run_gitlet_command(dir, &["branch", "topic/feature"])
        .assert()
        .success();

    run_gitlet_command(dir, &["status"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "=== Branches ===\n*master\ntopic/feature\n\n",
        ));
}

#[rstest]
fn create_existing_branch_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .success();

    run_gitlet_command(dir, &["branch", "feature"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "A branch with that name already exists.",
        ));
}

#[rstest]
#[case::dot_prefix(".hidden")]
#[case::double_dot("a..b")]
#[case::lock_suffix("feature.lock")]
#[case::whitespace("with space")]
fn create_branch_with_invalid_name_fails(init_repository_dir: TempDir, #[case] name: &str) {
    run_gitlet_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid branch name"));
}

#[rstest]
fn delete_branch_keeps_its_commits(init_repository_dir: TempDir) {
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

    run_gitlet_command(dir, &["rm-branch", "feature"])
        .assert()
        .success();

    assert!(!dir.join(".gitlet/refs/heads/feature").exists());
    run_gitlet_command(dir, &["cat-file", &feature_tip])
        .assert()
        .success()
        .stdout(predicate::str::contains("on feature"));
}

#[rstest]
fn delete_missing_branch_fails(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["rm-branch", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "A branch with that name does not exist.",
        ));
}

#[rstest]
fn delete_current_branch_fails(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["rm-branch", "master"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot remove the current branch."));
}
