use assert_fs::TempDir;
use common::command::{
    branch_tip, commit_file, head_commit_id, init_repository_dir, run_gitlet_command, stdout_of,
};
use predicates::prelude::predicate;
use rstest::rstest;

mod common;

fn logged_ids(log: &str) -> Vec<String> {
    log.lines()
        .filter_map(|line| line.strip_prefix("commit "))
        .map(str::to_string)
        .collect()
}

#[rstest]
fn log_follows_the_current_branch_only(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let base = head_commit_id(dir);
    run_gitlet_command(dir, &["branch", "side"])
        .assert()
        .success();
    commit_file(dir, "master.txt", "master\n", "on master");

    run_gitlet_command(dir, &["checkout", "side"])
        .assert()
        .success();
    commit_file(dir, "side.txt", "side\n", "on side");

    let log = stdout_of(run_gitlet_command(dir, &["log"]));
    let ids = logged_ids(&log);

    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], branch_tip(dir, "side"));
    assert_eq!(ids[1], base);
    assert!(!ids.contains(&branch_tip(dir, "master")));
}

#[rstest]
fn global_log_lists_every_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    run_gitlet_command(dir, &["branch", "side"])
        .assert()
        .success();
    commit_file(dir, "master.txt", "master\n", "on master");
    run_gitlet_command(dir, &["checkout", "side"])
        .assert()
        .success();
    commit_file(dir, "side.txt", "side\n", "on side");

    let global_log = stdout_of(run_gitlet_command(dir, &["global-log"]));
    let ids = logged_ids(&global_log);

    // root, "add hello", "on master", "on side"
    assert_eq!(ids.len(), 4);
    assert!(ids.contains(&branch_tip(dir, "master")));
    assert!(ids.contains(&branch_tip(dir, "side")));
    assert!(global_log.contains("initial commit"));
}

#[rstest]
fn global_log_keeps_commits_no_branch_reaches(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    let base = head_commit_id(dir);
    commit_file(dir, "dropped.txt", "dropped\n", "soon unreachable");
    let dropped = head_commit_id(dir);

    run_gitlet_command(dir, &["reset", &base])
        .assert()
        .success();

    let global_log = stdout_of(run_gitlet_command(dir, &["global-log"]));
    assert!(logged_ids(&global_log).contains(&dropped));
}

#[rstest]
fn find_prints_every_matching_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir.path();
    commit_file(dir, "one.txt", "one\n", "same message");
    let first = head_commit_id(dir);
    commit_file(dir, "two.txt", "two\n", "same message");
    let second = head_commit_id(dir);

    let found = stdout_of(run_gitlet_command(dir, &["find", "same message"]));
    let mut found = found.lines().map(str::to_string).collect::<Vec<_>>();
    found.sort();
    let mut expected = vec![first, second];
    expected.sort();

    assert_eq!(found, expected);
}

#[rstest]
fn find_without_match_fails(init_repository_dir: TempDir) {
    run_gitlet_command(init_repository_dir.path(), &["find", "never written"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Found no commit with that message.",
        ));
}
