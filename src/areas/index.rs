//! Staging area
//!
//! The staging area holds the changes the next commit will apply on top of the
//! current branch tip: a map of pending additions (path -> blob id) and a set of
//! pending removals. It is the only mutable piece of repository state besides
//! the branch pointers.
//!
//! ## Persistence
//!
//! The area is stored in `.gitlet/index` (see [`crate::artifacts::index`] for the
//! layout). Writes go to `index.lock` under an exclusive lock and are then
//! renamed over the real file, so a reader never observes a half-written or
//! half-cleared staging area.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::stage_entry::StageEntry;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

const LOCK_FILE_EXTENSION: &str = "lock";

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the staging file (typically `.gitlet/index`)
    path: Box<Path>,
    /// Staged content, keyed by path
    additions: BTreeMap<PathBuf, ObjectId>,
    /// Paths staged for removal
    removals: BTreeSet<PathBuf>,
    /// Set when the in-memory state diverges from disk
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            additions: BTreeMap::new(),
            removals: BTreeSet::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn additions(&self) -> &BTreeMap<PathBuf, ObjectId> {
        &self.additions
    }

    pub fn removals(&self) -> &BTreeSet<PathBuf> {
        &self.removals
    }

    pub fn is_staged_for_addition(&self, path: &Path) -> bool {
        self.additions.contains_key(path)
    }

    pub fn is_staged_for_removal(&self, path: &Path) -> bool {
        self.removals.contains(path)
    }

    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.removals.is_empty()
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Stage `path -> oid`, cancelling any pending removal of the same path
    pub fn stage_addition(&mut self, path: PathBuf, oid: ObjectId) {
        self.removals.remove(&path);
        self.additions.insert(path, oid);
        self.changed = true;
    }

    /// Stage the removal of `path`, dropping any pending addition of it
    pub fn stage_removal(&mut self, path: PathBuf) {
        self.additions.remove(&path);
        self.removals.insert(path);
        self.changed = true;
    }

    /// Forget every pending change for `path`
    pub fn unstage(&mut self, path: &Path) {
        let removed_addition = self.additions.remove(path).is_some();
        let removed_removal = self.removals.remove(path);

        self.changed |= removed_addition || removed_removal;
    }

    pub fn clear(&mut self) {
        if !self.is_empty() {
            self.changed = true;
        }

        self.additions.clear();
        self.removals.clear();
    }

    /// Load the staging area from disk
    ///
    /// A missing or empty file is an empty staging area. The trailing checksum is
    /// verified before the loaded state is accepted.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(self.path())
            .with_context(|| format!("Unable to open staging file {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        if lock.deref_mut().metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock);
        let entries_count = Self::parse_header(&mut reader)?;

        for _ in 0..entries_count {
            match StageEntry::read_from(&mut reader)? {
                StageEntry::Addition { path, oid } => {
                    self.additions.insert(path, oid);
                }
                StageEntry::Removal { path } => {
                    self.removals.insert(path);
                }
            }
        }

        reader.verify()
    }

    fn parse_header(reader: &mut Checksum) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(std::io::Cursor::new(header_bytes))?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid staging file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported staging file version: {}",
                header.version
            ));
        }

        Ok(header.entries_count)
    }

    fn entries(&self) -> impl Iterator<Item = StageEntry> + '_ {
        let additions = self
            .additions
            .iter()
            .map(|(path, oid)| StageEntry::Addition {
                path: path.clone(),
                oid: oid.clone(),
            });
        let removals = self
            .removals
            .iter()
            .map(|path| StageEntry::Removal { path: path.clone() });

        additions.chain(removals)
    }

    /// Persist the staging area atomically
    pub fn write_updates(&mut self) -> anyhow::Result<()> {
        let lock_path = self.path.with_extension(LOCK_FILE_EXTENSION);

        {
            let mut lock_file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&lock_path)
                .with_context(|| format!("Unable to open {}", lock_path.display()))?;
            let lock = file_guard::lock(&mut lock_file, file_guard::Lock::Exclusive, 0, 1)?;

            let mut writer = Checksum::new(lock);

            let entries_count = (self.additions.len() + self.removals.len()) as u32;
            let header = IndexHeader::new(String::from(SIGNATURE), VERSION, entries_count);
            writer.write(&header.serialize()?)?;

            for entry in self.entries() {
                writer.write(&entry.serialize()?)?;
            }

            writer.write_checksum()?;
        }

        std::fs::rename(&lock_path, &self.path).with_context(|| {
            format!(
                "Unable to move {} into place at {}",
                lock_path.display(),
                self.path.display()
            )
        })?;
        self.changed = false;

        tracing::debug!(
            additions = self.additions.len(),
            removals = self.removals.len(),
            "staging area written"
        );

        Ok(())
    }

    /// Write an empty staging file, used when a repository is created
    pub fn write_empty(&mut self) -> anyhow::Result<()> {
        self.additions.clear();
        self.removals.clear();
        debug_assert_eq!(IndexHeader::empty().entries_count, 0);

        self.write_updates()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn staging_file(dir: &TempDir) -> Box<Path> {
        dir.path().join("index").into_boxed_path()
    }

    #[test]
    fn staged_changes_survive_a_reload() {
        let dir = TempDir::new().unwrap();
        let mut index = Index::new(staging_file(&dir));

        index.stage_addition(PathBuf::from("a.txt"), oid('a'));
        index.stage_addition(PathBuf::from("dir/b.txt"), oid('b'));
        index.stage_removal(PathBuf::from("gone.txt"));
        index.write_updates().unwrap();

        let mut reloaded = Index::new(staging_file(&dir));
        reloaded.rehydrate().unwrap();

        assert_eq!(reloaded.additions(), index.additions());
        assert_eq!(reloaded.removals(), index.removals());
        assert!(!reloaded.has_changed());
    }

    #[test]
    fn missing_file_is_an_empty_staging_area() {
        let dir = TempDir::new().unwrap();
        let mut index = Index::new(staging_file(&dir));

        index.rehydrate().unwrap();

        assert!(index.is_empty());
    }

    #[test]
    fn corrupted_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut index = Index::new(staging_file(&dir));
        index.stage_addition(PathBuf::from("a.txt"), oid('a'));
        index.write_updates().unwrap();

        let mut bytes = std::fs::read(staging_file(&dir)).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        std::fs::write(staging_file(&dir), bytes).unwrap();

        assert!(Index::new(staging_file(&dir)).rehydrate().is_err());
    }

    #[test]
    fn addition_and_removal_of_a_path_are_exclusive() {
        let dir = TempDir::new().unwrap();
        let mut index = Index::new(staging_file(&dir));

        index.stage_removal(PathBuf::from("a.txt"));
        index.stage_addition(PathBuf::from("a.txt"), oid('a'));
        assert!(index.is_staged_for_addition(Path::new("a.txt")));
        assert!(!index.is_staged_for_removal(Path::new("a.txt")));

        index.stage_removal(PathBuf::from("a.txt"));
        assert!(!index.is_staged_for_addition(Path::new("a.txt")));
        assert!(index.is_staged_for_removal(Path::new("a.txt")));

        index.unstage(Path::new("a.txt"));
        assert!(index.is_empty());
    }
}
