//! Command implementations
//!
//! - `plumbing`: object store access (hash-object, cat-file)
//! - `porcelain`: version control workflows (add, commit, checkout, merge, ...)
//!
//! Porcelain commands never touch the object files directly; they go through
//! the repository areas like the plumbing ones do.

pub mod plumbing;
pub mod porcelain;
