//! Persistent repository areas
//!
//! - `database`: content-addressed object store for blobs and commits
//! - `commit_index`: journal of every commit ever created
//! - `index`: staging area of pending additions and removals
//! - `refs`: branches and HEAD
//! - `workspace`: the working area files are checked out into
//! - `repository`: the handle owning all of the above

pub mod commit_index;
pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
