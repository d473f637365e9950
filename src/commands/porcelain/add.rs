use crate::areas::repository::Repository;
use crate::errors::RepositoryError;
use std::path::Path;

impl Repository {
    /// Stage the working content of `path`
    ///
    /// Content identical to what the head commit tracks is never staged; any
    /// pending entry for the path is dropped instead.
    pub async fn add(&self, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let path = self.workspace().relative_path(Path::new(path))?;

        if !self.workspace().is_file(&path) {
            return Err(RepositoryError::FileNotFound(path).into());
        }

        let index = self.index();
        let mut index = index.lock().await;

        // Load the staging area from the disk
        index.rehydrate()?;

        let (_, head_commit) = self.head_commit()?;
        let blob = self.workspace().parse_blob(&path)?;
        let blob_id = self.database().store(&blob)?;

        if head_commit.tracks(&path) == Some(&blob_id) {
            tracing::debug!(path = %path.display(), "content matches head, unstaging");
            index.unstage(&path);
        } else {
            index.stage_addition(path, blob_id);
        }

        if index.has_changed() {
            index.write_updates()?;
        }

        Ok(())
    }
}
