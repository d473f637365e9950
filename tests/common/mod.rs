#![allow(dead_code)]

pub mod command;
pub mod file;

/// Root commit id; the root commit is identical in every repository
pub fn root_commit_id(dir: &std::path::Path) -> String {
    let output = command::run_gitlet_command(dir, &["find", "initial commit"])
        .output()
        .expect("Failed to run find");

    String::from_utf8(output.stdout)
        .expect("find printed invalid UTF-8")
        .trim()
        .to_string()
}
