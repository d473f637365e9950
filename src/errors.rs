//! Domain errors
//!
//! Every validation failure a command can hit is a [`RepositoryError`]. They are
//! detected before any write happens and travel inside `anyhow::Error`, so callers
//! recover them with `downcast_ref::<RepositoryError>()`. Anything that is not a
//! `RepositoryError` is a storage failure (I/O, permissions, corrupt objects).

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;

/// Broad classification used to pick the process exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed invocation (bad argument shape or value)
    Usage,
    /// The repository is not in a state that allows the operation
    State,
    /// Persistence failure
    Storage,
}

impl ErrorKind {
    pub fn of(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<RepositoryError>() {
            Some(error) => error.kind(),
            None => ErrorKind::Storage,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            ErrorKind::State => ExitCode::from(1),
            ErrorKind::Usage => ExitCode::from(2),
            // sysexits.h EX_IOERR
            ErrorKind::Storage => ExitCode::from(74),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,

    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("File does not exist.")]
    FileNotFound(PathBuf),

    #[error("No reason to remove the file.")]
    NotTracked(PathBuf),

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("Found no commit with that message.")]
    NoCommitWithMessage(String),

    #[error("No such branch exists.")]
    NoSuchBranch(String),

    #[error("A branch with that name does not exist.")]
    BranchNotFound(String),

    #[error("A branch with that name already exists.")]
    AlreadyExists(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrent(String),

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("No commit with that id exists.")]
    NoSuchCommit(String),

    #[error("Commit id {prefix} is ambiguous; candidates: {}", .candidates.join(", "))]
    AmbiguousCommit {
        prefix: String,
        candidates: Vec<String>,
    },

    #[error("File does not exist in that commit.")]
    FileNotInCommit(PathBuf),

    #[error("{report}")]
    UncommittedChangesWouldBeOverwritten { paths: Vec<PathBuf>, report: String },

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    CannotMergeSelf(String),

    #[error("Object {0} not found")]
    ObjectNotFound(ObjectId),

    #[error("No common ancestor between {0} and {1}")]
    NoCommonAncestor(ObjectId, ObjectId),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::EmptyCommitMessage | RepositoryError::InvalidBranchName(_) => {
                ErrorKind::Usage
            }
            RepositoryError::ObjectNotFound(_) => ErrorKind::Storage,
            _ => ErrorKind::State,
        }
    }
}
