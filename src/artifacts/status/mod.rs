//! Working area status report
//!
//! The report compares three things: the head commit's snapshot, the staging
//! area and the files actually present in the working area.
//!
//! ## Components
//!
//! - `file_change`: kinds of unstaged modifications
//! - `status_info`: report computation and rendering

pub mod file_change;
pub mod status_info;
