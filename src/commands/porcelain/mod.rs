//! Porcelain commands
//!
//! The user-facing operations, each an `impl Repository` block. Commands that
//! touch the staging area lock it, reload it from disk, and write it back
//! only after every validation has passed.
//!
//! ## Commands
//!
//! - `init`: create a repository with its root commit
//! - `add`, `rm`: stage additions and removals
//! - `commit`: record the staged snapshot
//! - `log`: first-parent history, every commit, and lookup by message
//! - `status`: branches, staging area and working area changes
//! - `checkout`: switch branches or restore single files
//! - `branch`: create and delete branches
//! - `reset`: move the current branch to another commit
//! - `merge`: three-way merge of another branch

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
