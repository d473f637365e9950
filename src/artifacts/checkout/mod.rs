//! Materializing snapshots into the working area
//!
//! Switching branches, resetting and merging all end by replacing the files of
//! one snapshot with those of another. The change set is planned first and
//! every file that would lose work is reported before anything is touched.

pub mod conflict;
pub mod migration;
