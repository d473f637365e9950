use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Repository with `hello.txt` ("hello\n") committed on master
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_gitlet_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("hello.txt"),
        "hello\n".to_string(),
    ));
    run_gitlet_command(repository_dir.path(), &["add", "hello.txt"])
        .assert()
        .success();
    gitlet_commit(repository_dir.path(), "add hello")
        .assert()
        .success();

    repository_dir
}

pub fn run_gitlet_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("gitlet").expect("Failed to find gitlet binary");
    cmd.envs(vec![("NO_PAGER", "1"), ("GITLET_DATE", COMMIT_DATE)]);
    cmd.env_remove("GITLET_LOG");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn gitlet_commit(dir: &Path, message: &str) -> Command {
    run_gitlet_command(dir, &["commit", "-m", message])
}

/// Write `path`, stage it and commit it in one go
pub fn commit_file(dir: &Path, path: &str, content: &str, message: &str) {
    write_file(FileSpec::new(dir.join(path), content.to_string()));
    run_gitlet_command(dir, &["add", path]).assert().success();
    gitlet_commit(dir, message).assert().success();
}

pub fn current_branch(dir: &Path) -> String {
    let head = std::fs::read_to_string(dir.join(".gitlet").join("HEAD"))
        .expect("Failed to read HEAD");

    head.trim()
        .strip_prefix("ref: refs/heads/")
        .expect("HEAD does not name a branch")
        .to_string()
}

pub fn branch_tip(dir: &Path, branch: &str) -> String {
    std::fs::read_to_string(dir.join(".gitlet").join("refs").join("heads").join(branch))
        .expect("Failed to read branch")
        .trim()
        .to_string()
}

pub fn head_commit_id(dir: &Path) -> String {
    branch_tip(dir, &current_branch(dir))
}

pub fn stdout_of(mut cmd: Command) -> String {
    let output = cmd.output().expect("Failed to run gitlet");
    String::from_utf8(output.stdout).expect("gitlet printed invalid UTF-8")
}
