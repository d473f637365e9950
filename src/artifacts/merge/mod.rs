//! Three-way merge
//!
//! - `bca_finder`: chooses the base commit of a merge
//! - `resolver`: reconciles the base, `into` and `in` snapshots path by path

pub mod bca_finder;
pub mod resolver;

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;

/// What a merge did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The given branch is already contained in the current one
    AlreadyUpToDate,
    /// The current branch pointer moved to the given branch's tip
    FastForward(ObjectId),
    /// A two-parent commit was created; `conflicts` lists the paths that needed markers
    Merged {
        commit: ObjectId,
        conflicts: Vec<PathBuf>,
    },
}

impl MergeOutcome {
    pub fn has_conflicts(&self) -> bool {
        matches!(self, MergeOutcome::Merged { conflicts, .. } if !conflicts.is_empty())
    }
}
