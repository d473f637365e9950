use crate::areas::repository::Repository;
use crate::errors::RepositoryError;
use std::path::Path;

impl Repository {
    /// Unstage `path`, or schedule a tracked path for removal
    ///
    /// A tracked path is also deleted from the working area. A path that is
    /// only staged is just unstaged.
    pub async fn rm(&self, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let path = self.workspace().relative_path(Path::new(path))?;

        let index = self.index();
        let mut index = index.lock().await;

        index.rehydrate()?;

        let (_, head_commit) = self.head_commit()?;
        let is_tracked = head_commit.tracks(&path).is_some();

        if is_tracked {
            index.stage_removal(path.clone());
        } else if index.is_staged_for_addition(&path) {
            index.unstage(&path);
        } else {
            return Err(RepositoryError::NotTracked(path).into());
        }

        index.write_updates()?;

        if is_tracked && self.workspace().is_file(&path) {
            self.workspace().remove_file(&path)?;
        }

        Ok(())
    }
}
