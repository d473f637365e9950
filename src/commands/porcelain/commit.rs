use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, Snapshot};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    pub async fn commit(&self, message: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;

        let message = message.trim().to_string();
        if message.is_empty() {
            return Err(RepositoryError::EmptyCommitMessage.into());
        }

        let index = self.index();
        let mut index = index.lock().await;

        // Load the staging area from the disk
        index.rehydrate()?;

        if index.is_empty() {
            return Err(RepositoryError::NothingToCommit.into());
        }

        let (head_oid, head_commit) = self.head_commit()?;
        let snapshot = staged_snapshot(head_commit.into_snapshot(), &index);

        self.write_commit(vec![head_oid], message, snapshot, &mut index)
    }

    /// Persist a commit on the current branch and clear the staging area
    ///
    /// Writes happen in this order: commit object, journal, branch tip, staging
    /// area. Callers validate everything beforehand.
    pub(crate) fn write_commit(
        &self,
        parents: Vec<ObjectId>,
        message: String,
        snapshot: Snapshot,
        index: &mut Index,
    ) -> anyhow::Result<ObjectId> {
        let commit = Commit::new(parents, self.config().now(), message, snapshot);
        let commit_id = self.database().store(&commit)?;

        self.commit_index().append(&commit_id)?;
        self.refs().update_head(&commit_id)?;

        index.clear();
        index.write_updates()?;

        let branch = self.refs().current_branch()?;
        tracing::info!(
            %branch,
            oid = %commit_id,
            parents = commit.parents().len(),
            "commit created"
        );
        writeln!(
            self.writer(),
            "[{} {}] {}",
            branch,
            commit_id.to_short_oid(),
            commit.short_message()
        )?;

        Ok(commit_id)
    }
}

/// The head snapshot with staged additions laid over it and removals taken out
fn staged_snapshot(mut snapshot: Snapshot, index: &Index) -> Snapshot {
    snapshot.extend(
        index
            .additions()
            .iter()
            .map(|(path, oid)| (path.clone(), oid.clone())),
    );
    snapshot.retain(|path, _| !index.is_staged_for_removal(path));

    snapshot
}
