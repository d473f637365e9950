use crate::areas::repository::Repository;
use crate::artifacts::branch::revision::Revision;
use crate::artifacts::objects::object_id::ObjectId;

impl Repository {
    /// Point the current branch at `revision` and check its snapshot out
    ///
    /// Only the branch pointer moves; no commit is created or dropped.
    pub async fn reset(&self, revision: &str) -> anyhow::Result<ObjectId> {
        self.ensure_initialized()?;
        let target_oid = Revision::try_parse(revision)?.resolve(self.database())?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let (_, head_commit) = self.head_commit()?;
        let target_commit = self.database().load_commit(&target_oid)?;
        self.migrate(head_commit.snapshot(), target_commit.snapshot())?;

        self.refs().update_head(&target_oid)?;
        index.clear();
        index.write_updates()?;

        Ok(target_oid)
    }
}
