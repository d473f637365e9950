//! Plumbing commands
//!
//! Direct access to the object store, mostly useful for scripting and for
//! inspecting what porcelain commands wrote.
//!
//! ## Commands
//!
//! - `hash-object`: compute a file's blob id and optionally store it
//! - `cat-file`: print a stored blob or commit

pub mod cat_file;
pub mod hash_object;
