//! Best common ancestor finder
//!
//! Finds the commit a three-way merge uses as its base.
//!
//! ## Algorithm Overview
//!
//! ### Phase 1: Walk both histories
//!
//! A breadth-first walk from each tip follows every parent (both parents of a
//! merge commit, in order) and records, per reached commit, its distance from
//! the tip and the order in which it was discovered. Commits reached from both
//! sides are the common ancestors.
//!
//! If either tip is reached from the other, that tip is the answer: the merge is
//! either already satisfied or a fast-forward.
//!
//! ### Phase 2: Rank the common ancestors
//!
//! Every common ancestor is a candidate, including ones reachable from another
//! candidate. The one with the smallest total distance to both tips wins; ties
//! go to the one closer to the `into` tip, then to the one the `into` walk
//! discovered first. The result therefore depends only on the graph.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};
use std::fmt;

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const NONE = 0b00;
        const VISITED_FROM_INTO = 0b01;
        const VISITED_FROM_IN = 0b10;
        const VISITED_FROM_BOTH = Self::VISITED_FROM_INTO.bits() | Self::VISITED_FROM_IN.bits();
    }
}

impl fmt::Debug for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags = Vec::new();
        if self.contains(VisitState::VISITED_FROM_INTO) {
            flags.push("INTO");
        }
        if self.contains(VisitState::VISITED_FROM_IN) {
            flags.push("IN");
        }
        if flags.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", flags.join("|"))
        }
    }
}

/// Where a walk reached a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Reach {
    distance: usize,
    order: usize,
}

/// Finds the best common ancestor of two commits
///
/// The commit loader makes the finder independent of storage: the repository
/// passes its commit cache, tests pass an in-memory graph.
pub struct BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> BCAFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> anyhow::Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Best common ancestor of `into_oid` and `in_oid`, `None` for disjoint histories
    pub fn find_best_common_ancestor(
        &self,
        into_oid: &ObjectId,
        in_oid: &ObjectId,
    ) -> anyhow::Result<Option<ObjectId>> {
        let into_reach = self.walk(into_oid)?;
        if into_reach.contains_key(in_oid) {
            return Ok(Some(in_oid.clone()));
        }

        let in_reach = self.walk(in_oid)?;
        if in_reach.contains_key(into_oid) {
            return Ok(Some(into_oid.clone()));
        }

        let mut states = HashMap::<ObjectId, VisitState>::new();
        for oid in into_reach.keys() {
            *states.entry(oid.clone()).or_insert(VisitState::NONE) |= VisitState::VISITED_FROM_INTO;
        }
        for oid in in_reach.keys() {
            *states.entry(oid.clone()).or_insert(VisitState::NONE) |= VisitState::VISITED_FROM_IN;
        }

        let common_ancestors = states
            .iter()
            .filter(|(_, state)| state.contains(VisitState::VISITED_FROM_BOTH))
            .map(|(oid, _)| oid.clone())
            .collect::<Vec<_>>();

        tracing::debug!(count = common_ancestors.len(), "common ancestors found");

        let best = common_ancestors
            .into_iter()
            .filter_map(|oid| {
                let into = into_reach.get(&oid)?;
                let into_in = in_reach.get(&oid)?;
                Some(((into.distance + into_in.distance, into.distance, into.order), oid))
            })
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, oid)| oid);

        if let Some(oid) = &best {
            tracing::debug!(%oid, "best common ancestor chosen");
        }

        Ok(best)
    }

    /// Breadth-first walk over all parents, recording first-reach distances
    fn walk(&self, tip: &ObjectId) -> anyhow::Result<HashMap<ObjectId, Reach>> {
        let mut reached = HashMap::from([(
            tip.clone(),
            Reach {
                distance: 0,
                order: 0,
            },
        )]);
        let mut queue = VecDeque::from([(tip.clone(), 0)]);

        while let Some((oid, distance)) = queue.pop_front() {
            let commit = (self.commit_loader)(&oid)?;

            for parent in commit.parents {
                if reached.contains_key(&parent) {
                    continue;
                }

                let reach = Reach {
                    distance: distance + 1,
                    order: reached.len(),
                };
                reached.insert(parent.clone(), reach);
                queue.push_back((parent, distance + 1));
            }
        }

        Ok(reached)
    }
}
