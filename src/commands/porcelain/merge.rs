use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::MergeOutcome;
use crate::artifacts::merge::bca_finder::BCAFinder;
use crate::artifacts::merge::resolver::{self, ConflictSides};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::io::Write;

const ALREADY_UP_TO_DATE_MESSAGE: &str = "Given branch is an ancestor of the current branch.";
const FAST_FORWARD_MESSAGE: &str = "Current branch fast-forwarded.";
const CONFLICT_MESSAGE: &str = "Encountered a merge conflict.";

impl Repository {
    /// Merge the branch `given` into the current one
    ///
    /// Conflicts do not abort the merge: conflicted paths get both sides between
    /// markers and the merge commit is still created.
    pub async fn merge(&self, given: &str) -> anyhow::Result<MergeOutcome> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        if !index.is_empty() {
            return Err(RepositoryError::UncommittedChanges.into());
        }

        let given_branch = BranchName::try_parse(given.to_string())
            .map_err(|_| RepositoryError::BranchNotFound(given.to_string()))?;
        let in_oid = self
            .refs()
            .read_branch(&given_branch)?
            .ok_or_else(|| RepositoryError::BranchNotFound(given.to_string()))?;
        let into_branch = self.refs().current_branch()?;
        if into_branch == given_branch {
            return Err(RepositoryError::CannotMergeSelf(given.to_string()).into());
        }

        let (into_oid, into_commit) = self.head_commit()?;
        let in_commit = self.database().load_commit(&in_oid)?;

        let bca_finder =
            BCAFinder::new(|oid: &ObjectId| self.database().get_or_load_slim_commit(oid));
        let base_oid = bca_finder
            .find_best_common_ancestor(&into_oid, &in_oid)?
            .ok_or_else(|| RepositoryError::NoCommonAncestor(into_oid.clone(), in_oid.clone()))?;
        tracing::debug!(into = %into_oid, given = %in_oid, base = %base_oid, "merge base chosen");

        if base_oid == in_oid {
            writeln!(self.writer(), "{ALREADY_UP_TO_DATE_MESSAGE}")?;
            return Ok(MergeOutcome::AlreadyUpToDate);
        }

        if base_oid == into_oid {
            self.migrate(into_commit.snapshot(), in_commit.snapshot())?;
            self.refs().update_head(&in_oid)?;
            index.clear();
            index.write_updates()?;

            tracing::info!(branch = %into_branch, oid = %in_oid, "fast-forward");
            writeln!(self.writer(), "{FAST_FORWARD_MESSAGE}")?;
            return Ok(MergeOutcome::FastForward(in_oid));
        }

        let base_commit = self.database().load_commit(&base_oid)?;
        let resolution = resolver::resolve(
            base_commit.snapshot(),
            into_commit.snapshot(),
            in_commit.snapshot(),
        );

        let mut merged = resolution.merged;
        let mut conflict_blobs = Vec::with_capacity(resolution.conflicts.len());
        for (path, sides) in &resolution.conflicts {
            let blob = Blob::new(self.conflict_blob_content(sides, &given_branch)?);
            merged.insert(path.clone(), blob.object_id()?);
            conflict_blobs.push(blob);
        }

        // validate the working area before anything is written
        let mut migration = Migration::new(self, into_commit.snapshot(), &merged);
        migration.plan_changes()?;

        for blob in &conflict_blobs {
            self.database().store(blob)?;
        }

        let message = format!("Merged {given_branch} into {into_branch}.");
        let commit_oid =
            self.write_commit(vec![into_oid, in_oid], message, merged.clone(), &mut index)?;
        migration.apply_changes()?;

        let conflicts = resolution.conflicts.into_keys().collect::<Vec<_>>();
        tracing::info!(oid = %commit_oid, conflicts = conflicts.len(), "merge committed");

        let outcome = MergeOutcome::Merged {
            commit: commit_oid,
            conflicts,
        };
        if outcome.has_conflicts() {
            writeln!(self.writer(), "{CONFLICT_MESSAGE}")?;
        }

        Ok(outcome)
    }

    fn conflict_blob_content(
        &self,
        sides: &ConflictSides,
        given_branch: &BranchName,
    ) -> anyhow::Result<Bytes> {
        let load = |oid: &Option<ObjectId>| -> anyhow::Result<Option<Bytes>> {
            oid.as_ref()
                .map(|oid| self.database().load_blob_content(oid))
                .transpose()
        };

        let into = load(&sides.into)?;
        let given = load(&sides.given)?;

        Ok(resolver::conflict_content(
            into.as_deref(),
            given.as_deref(),
            given_branch.as_ref(),
        ))
    }
}
