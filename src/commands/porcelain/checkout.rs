use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Switch to `branch`, rewriting the working area to its tip
    pub async fn checkout_branch(&self, branch: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(branch.to_string())
            .map_err(|_| RepositoryError::NoSuchBranch(branch.to_string()))?;
        let target_oid = self
            .refs()
            .read_branch(&branch_name)?
            .ok_or_else(|| RepositoryError::NoSuchBranch(branch.to_string()))?;

        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::AlreadyOnBranch(branch.to_string()).into());
        }

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, head_commit) = self.head_commit()?;
        let target_commit = self.database().load_commit(&target_oid)?;
        self.migrate(head_commit.snapshot(), target_commit.snapshot())?;

        self.refs().set_head(&branch_name)?;
        index.clear();
        index.write_updates()?;

        writeln!(self.writer(), "Switched to branch '{branch_name}'")?;

        Ok(())
    }

    /// Restore `path` as the head commit tracks it
    pub fn checkout_file(&self, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let head_oid = self.refs().read_head()?;

        self.restore_file(&head_oid, path)
    }

    /// Restore `path` as the commit `revision` names tracks it
    pub fn checkout_commit_file(&self, revision: &str, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let commit_oid = Revision::try_parse(revision)?.resolve(self.database())?;

        self.restore_file(&commit_oid, path)
    }

    fn restore_file(&self, commit_oid: &ObjectId, path: &str) -> anyhow::Result<()> {
        let path = self.workspace().relative_path(Path::new(path))?;
        let commit = self.database().load_commit(commit_oid)?;

        let blob_oid = commit
            .tracks(&path)
            .ok_or_else(|| RepositoryError::FileNotInCommit(path.clone()))?;
        let content = self.database().load_blob_content(blob_oid)?;

        self.workspace().write_file(&path, &content)?;
        tracing::debug!(path = %path.display(), commit = %commit_oid, "file restored");

        Ok(())
    }

    /// Move the working area from `current` to `target`
    ///
    /// Nothing is written if a working file would lose uncommitted work.
    pub(crate) fn migrate(&self, current: &Snapshot, target: &Snapshot) -> anyhow::Result<()> {
        Migration::new(self, current, target).apply_changes()
    }
}
