use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::RepositoryError;
use anyhow::Context;
use std::io::Write;

impl Repository {
    /// Create `.gitlet` with the root commit on the default branch
    pub async fn init(&self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(RepositoryError::AlreadyInitialized.into());
        }

        for dir in [
            self.database().objects_path().to_path_buf(),
            self.refs().heads_path().to_path_buf(),
        ] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Unable to create {}", dir.display()))?;
        }

        let root_oid = self.database().store(&Commit::root())?;
        self.commit_index().append(&root_oid)?;

        let default_branch = BranchName::default_branch();
        self.refs().create_branch(&default_branch, &root_oid)?;
        self.refs().set_head(&default_branch)?;

        let index = self.index();
        let mut index = index.lock().await;
        index.write_empty()?;

        tracing::info!(root = %root_oid, "repository created");
        writeln!(
            self.writer(),
            "Initialized empty Gitlet repository in {}",
            self.git_path().display()
        )?;

        Ok(())
    }
}
