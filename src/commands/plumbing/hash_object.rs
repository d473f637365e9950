use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use std::io::Write;
use std::path::Path;

impl Repository {
    /// Blob id of a working file, stored as well when `write` is set
    pub fn hash_object(&self, object_path: &str, write: bool) -> anyhow::Result<ObjectId> {
        let object_path = self.workspace().relative_path(Path::new(object_path))?;
        let blob = self.workspace().parse_blob(&object_path)?;

        let object_id = if write {
            self.ensure_initialized()?;
            self.database().store(&blob)?
        } else {
            blob.object_id()?
        };

        writeln!(self.writer(), "{object_id}")?;

        Ok(object_id)
    }
}
