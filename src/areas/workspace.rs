use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeSet;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 1] = [".gitlet"];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Turn a user-supplied path into one relative to the workspace root
    pub fn relative_path(&self, path: &Path) -> anyhow::Result<PathBuf> {
        let path = if path.is_absolute() {
            path.strip_prefix(&self.path)
                .with_context(|| format!("{} is outside the repository", path.display()))?
        } else {
            path
        };

        let mut relative_path = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => relative_path.push(name),
                Component::CurDir => {}
                _ => anyhow::bail!("{} is outside the repository", path.display()),
            }
        }

        Ok(relative_path)
    }

    pub fn is_file(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn is_dir(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_dir()
    }

    pub fn parse_blob(&self, file_path: &Path) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(file_path)?))
    }

    /// Id the file's content would have as a blob, without storing it
    pub fn hash_file(&self, file_path: &Path) -> anyhow::Result<Option<ObjectId>> {
        if !self.is_file(file_path) {
            return Ok(None);
        }

        Ok(Some(self.parse_blob(file_path)?.object_id()?))
    }

    /// Every file in the working area, relative and sorted
    pub fn list_files(&self) -> anyhow::Result<BTreeSet<PathBuf>> {
        self.list_files_under(Path::new(""))
    }

    pub fn list_files_under(&self, dir_path: &Path) -> anyhow::Result<BTreeSet<PathBuf>> {
        let root = self.path.join(dir_path);

        if !root.exists() {
            return Ok(BTreeSet::new());
        }

        WalkDir::new(&root)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| {
                entry
                    .path()
                    .strip_prefix(self.path.as_ref())
                    .map(PathBuf::from)
                    .with_context(|| format!("Unexpected path {}", entry.path().display()))
            })
            .collect()
    }

    fn is_ignored(path: &Path) -> bool {
        path.file_name()
            .map(|name| IGNORED_PATHS.contains(&name.to_string_lossy().as_ref()))
            .unwrap_or(false)
    }

    pub fn read_file(&self, file_path: &Path) -> anyhow::Result<Bytes> {
        let full_path = self.path.join(file_path);

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {:?}", file_path))?;

        Ok(Bytes::from(content))
    }

    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path).with_context(|| {
                format!("Failed to remove existing directory: {:?}", file_path)
            })?;
        }

        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create parent of: {:?}", file_path))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&full_path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(data)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))
    }

    /// Delete a file and every directory it leaves empty
    pub fn remove_file(&self, file_path: &Path) -> anyhow::Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_file() {
            std::fs::remove_file(&full_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        self.prune_empty_parent_dirs(file_path)
    }

    fn prune_empty_parent_dirs(&self, file_path: &Path) -> anyhow::Result<()> {
        for ancestor in file_path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }

            let dir_path = self.path.join(ancestor);
            if !dir_path.is_dir() || dir_path.read_dir()?.next().is_some() {
                break;
            }

            std::fs::remove_dir(&dir_path)
                .with_context(|| format!("Failed to remove directory: {:?}", ancestor))?;
        }

        Ok(())
    }

    // Deletions go first so that a file can replace a directory that only held
    // deleted files, and the other way around.
    pub fn apply_migration(&self, migration: &Migration) -> anyhow::Result<()> {
        for (file_path, _) in migration.actions_of(ActionType::Delete) {
            self.remove_file(file_path)?;
        }

        for action in [ActionType::Modify, ActionType::Add] {
            for (file_path, oid) in migration.actions_of(action) {
                let oid = oid
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("Invalid action and entry combination"))?;
                let data = migration.load_blob_data(oid)?;

                self.write_file(file_path, &data)?;
            }
        }

        Ok(())
    }
}
