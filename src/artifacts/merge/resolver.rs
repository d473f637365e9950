//! Path-by-path three-way reconciliation
//!
//! Every path present in the base, `into` or `in` snapshot is classified by the
//! triple (base, into, in), where any value may be absent:
//!
//! | base vs into | base vs in | into vs in | result            |
//! |--------------|------------|------------|-------------------|
//! | same         | same       |            | base              |
//! | same         | changed    |            | `in`              |
//! | changed      | same       |            | `into`            |
//! | changed      | changed    | same       | `into` (= `in`)   |
//! | changed      | changed    | different  | conflict          |
//!
//! Deleting a path counts as a change, so modify-versus-delete is a conflict.

use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Both sides of a conflicted path, `None` where that side deleted it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictSides {
    pub into: Option<ObjectId>,
    pub given: Option<ObjectId>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Cleanly merged paths; conflicted paths are not in here yet
    pub merged: Snapshot,
    pub conflicts: BTreeMap<PathBuf, ConflictSides>,
}

pub fn resolve(base: &Snapshot, into: &Snapshot, given: &Snapshot) -> Resolution {
    let paths = base
        .keys()
        .chain(into.keys())
        .chain(given.keys())
        .collect::<BTreeSet<_>>();

    let mut resolution = Resolution::default();

    for path in paths {
        let base_oid = base.get(path);
        let into_oid = into.get(path);
        let given_oid = given.get(path);

        let merged_oid = if into_oid == given_oid || base_oid == given_oid {
            into_oid
        } else if base_oid == into_oid {
            given_oid
        } else {
            resolution.conflicts.insert(
                path.clone(),
                ConflictSides {
                    into: into_oid.cloned(),
                    given: given_oid.cloned(),
                },
            );
            continue;
        };

        if let Some(oid) = merged_oid {
            resolution.merged.insert(path.clone(), oid.clone());
        }
    }

    resolution
}

/// Working content written for a conflicted path
///
/// ```text
/// <<<<<<< HEAD
/// <into content>=======
/// <in content>>>>>>>> <in branch>
/// ```
///
/// A side's content ends with a newline before the next marker; a deleted side
/// contributes nothing.
pub fn conflict_content(into: Option<&[u8]>, given: Option<&[u8]>, given_branch: &str) -> Bytes {
    let mut content = b"<<<<<<< HEAD\n".to_vec();
    push_side(&mut content, into);
    content.extend_from_slice(b"=======\n");
    push_side(&mut content, given);
    content.extend_from_slice(format!(">>>>>>> {given_branch}\n").as_bytes());

    Bytes::from(content)
}

fn push_side(content: &mut Vec<u8>, side: Option<&[u8]>) {
    if let Some(side) = side
        && !side.is_empty()
    {
        content.extend_from_slice(side);
        if !side.ends_with(b"\n") {
            content.push(b'\n');
        }
    }
}
