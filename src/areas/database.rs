//! Object store
//!
//! Content-addressed, append-only storage for blobs and commits. Objects are
//! zlib-compressed and laid out as `objects/<2 hex>/<38 hex>`. There is no
//! update or delete: storing an object that already exists is a no-op.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, ObjectBox, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{BufRead, Cursor, Read, Write};
use std::path::{Path, PathBuf};

const TEMP_OBJECT_PREFIX: &str = "tmp-obj-";

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
    commit_cache: RefCell<HashMap<ObjectId, SlimCommit>>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database {
            path,
            commit_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.path.join(object_id.to_path()).is_file()
    }

    /// Raw framed bytes of an object
    pub fn load(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        if !self.contains(object_id) {
            return Err(RepositoryError::ObjectNotFound(object_id.clone()).into());
        }

        self.read_object(self.path.join(object_id.to_path()))
    }

    /// Store an object unless it is already present and return its id
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            tracing::debug!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        std::fs::create_dir_all(
            object_path
                .parent()
                .context(format!("Invalid object path {}", object_path.display()))?,
        )
        .context(format!(
            "Unable to create object directory {}",
            object_path.display()
        ))?;

        self.write_object(object_path, object.serialize()?)?;
        tracing::debug!(oid = %object_id, kind = %object.object_type(), "object stored");

        Ok(object_id)
    }

    pub fn parse_object(&self, object_id: &ObjectId) -> anyhow::Result<ObjectBox> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(ObjectBox::Blob(Box::new(Blob::deserialize(object_reader)?))),
            ObjectType::Commit => Ok(ObjectBox::Commit(Box::new(Commit::deserialize(
                object_reader,
            )?))),
        }
    }

    pub fn parse_object_as_blob(&self, object_id: &ObjectId) -> anyhow::Result<Option<Blob>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Blob => Ok(Some(Blob::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    pub fn parse_object_as_commit(&self, object_id: &ObjectId) -> anyhow::Result<Option<Commit>> {
        let (object_type, object_reader) = self.parse_object_as_bytes(object_id)?;

        match object_type {
            ObjectType::Commit => Ok(Some(Commit::deserialize(object_reader)?)),
            _ => Ok(None),
        }
    }

    /// Load a commit, failing if the id names anything else
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        self.parse_object_as_commit(object_id)?
            .ok_or_else(|| RepositoryError::NoSuchCommit(object_id.to_string()).into())
    }

    /// Content of a blob, failing if the id names anything else
    pub fn load_blob_content(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.parse_object_as_blob(object_id)?
            .map(Blob::into_content)
            .ok_or_else(|| anyhow::anyhow!("Object {object_id} is not a blob"))
    }

    /// Graph-only view of a commit, memoized for ancestor walks
    pub fn get_or_load_slim_commit(&self, object_id: &ObjectId) -> anyhow::Result<SlimCommit> {
        if let Some(slim) = self.commit_cache.borrow().get(object_id) {
            return Ok(slim.clone());
        }

        let slim = self.load_commit(object_id)?.to_slim(object_id.clone());
        self.commit_cache
            .borrow_mut()
            .insert(object_id.clone(), slim.clone());

        Ok(slim)
    }

    pub fn get_object_type(&self, object_id: &ObjectId) -> anyhow::Result<ObjectType> {
        let (object_type, _) = self.parse_object_as_bytes(object_id)?;
        Ok(object_type)
    }

    fn parse_object_as_bytes(
        &self,
        object_id: &ObjectId,
    ) -> anyhow::Result<(ObjectType, impl BufRead)> {
        let object_content = self.load(object_id)?;
        let mut object_reader = Cursor::new(object_content);

        let (object_type, size) = ObjectType::read_header(&mut object_reader)?;
        let payload_size = object_reader.get_ref().len() - object_reader.position() as usize;
        if size != payload_size {
            return Err(anyhow::anyhow!(
                "Object {object_id} declares {size} bytes but holds {payload_size}"
            ));
        }

        Ok((object_type, object_reader))
    }

    fn read_object(&self, object_path: PathBuf) -> anyhow::Result<Bytes> {
        let object_content = std::fs::read(&object_path).context(format!(
            "Unable to read object file {}",
            object_path.display()
        ))?;

        Self::decompress(object_content.into())
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let object_content = Self::compress(object_content)?;

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // the rename is what makes the object visible
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("{TEMP_OBJECT_PREFIX}{}", rand::random::<u32>())
    }

    /// Find all objects whose id starts with `prefix`
    ///
    /// Prefixes of two or more characters only look inside the matching fan-out
    /// directory. Leftover temp files are never reported.
    pub fn find_objects_by_prefix(&self, prefix: &str) -> anyhow::Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        let mut matches = Vec::new();

        let directories = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{i:02x}")).collect()
        };

        for dir_name in directories {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path)
                .context(format!("Unable to list {}", dir_path.display()))?
            {
                let file_name = entry?.file_name();
                let file_name = file_name.to_string_lossy();
                if file_name.starts_with(TEMP_OBJECT_PREFIX) {
                    continue;
                }

                let full_oid = format!("{dir_name}{file_name}");
                if full_oid.starts_with(&prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use proptest::proptest;

    fn database(dir: &TempDir) -> Database {
        Database::new(dir.path().join("objects").into_boxed_path())
    }

    fn count_objects(dir: &TempDir) -> usize {
        walkdir::WalkDir::new(dir.path().join("objects"))
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .count()
    }

    proptest! {
        #[test]
        fn storing_twice_keeps_a_single_copy(
            content in proptest::collection::vec(proptest::num::u8::ANY, 0..128)
        ) {
            let dir = TempDir::new().unwrap();
            let database = database(&dir);
            let blob = Blob::new(Bytes::from(content.clone()));

            let first = database.store(&blob).unwrap();
            let second = database.store(&blob).unwrap();

            assert_eq!(first, second);
            assert_eq!(count_objects(&dir), 1);
            assert_eq!(database.load_blob_content(&first).unwrap(), Bytes::from(content));
        }
    }

    #[test]
    fn missing_object_is_reported_as_not_found() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let oid = ObjectId::try_parse("a".repeat(40)).unwrap();

        let error = database.load(&oid).unwrap_err();

        assert_eq!(
            error.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::ObjectNotFound(oid.clone()))
        );
        assert!(!database.contains(&oid));
    }

    #[test]
    fn commits_read_back_identically() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let blob_oid = database.store(&Blob::new(Bytes::from_static(b"hello"))).unwrap();
        let root_oid = database.store(&Commit::root()).unwrap();
        let commit = Commit::new(
            vec![root_oid.clone()],
            Commit::root().timestamp(),
            "add f".to_string(),
            [(PathBuf::from("f.txt"), blob_oid)].into(),
        );

        let oid = database.store(&commit).unwrap();

        assert_eq!(database.load_commit(&oid).unwrap(), commit);
        assert_eq!(
            database.get_or_load_slim_commit(&oid).unwrap().parents,
            vec![root_oid]
        );
    }

    #[test]
    fn prefix_lookup_finds_stored_objects() {
        let dir = TempDir::new().unwrap();
        let database = database(&dir);
        let oid = database.store(&Commit::root()).unwrap();

        let found = database.find_objects_by_prefix(&oid.as_ref()[..6]).unwrap();

        assert_eq!(found, vec![oid]);
        assert!(database.find_objects_by_prefix("0000000").unwrap().is_empty());
    }
}
