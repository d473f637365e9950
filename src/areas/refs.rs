//! Branches and HEAD
//!
//! Head never points at a commit directly: it names the active branch, and the
//! branch names the tip commit (`HEAD -> refs/heads/<name> -> <commit>`). That is
//! what lets `commit` advance "whatever branch is current".
//!
//! ## File Format
//!
//! - `refs/heads/<name>` holds a 40-character commit id
//! - `HEAD` holds `ref: refs/heads/<name>`
//!
//! Every write goes to a `.lock` sibling under an exclusive lock and is renamed
//! into place.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use anyhow::Context;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;
use walkdir::WalkDir;

/// Regex pattern for parsing the symbolic HEAD reference
const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";

pub const HEAD_REF_NAME: &str = "HEAD";

const LOCK_FILE_EXTENSION: &str = "lock";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (typically `.gitlet`)
    path: Box<Path>,
}

impl Refs {
    /// Name of the branch HEAD points to
    pub fn current_branch(&self) -> anyhow::Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read HEAD at {:?}", head_path))?;
        let content = content.trim();

        let symref_match = regex::Regex::new(SYMREF_REGEX)?
            .captures(content)
            .with_context(|| format!("HEAD does not name a branch: {content:?}"))?;

        BranchName::try_parse(symref_match[1].to_string())
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> anyhow::Result<bool> {
        Ok(&self.current_branch()? == branch_name)
    }

    /// Point HEAD at `branch_name`
    pub fn set_head(&self, branch_name: &BranchName) -> anyhow::Result<()> {
        self.update_ref_file(&self.head_path(), format!("ref: refs/heads/{branch_name}"))?;
        tracing::debug!(branch = %branch_name, "HEAD moved");

        Ok(())
    }

    /// Tip of the current branch
    pub fn read_head(&self) -> anyhow::Result<ObjectId> {
        let branch_name = self.current_branch()?;

        self.read_branch(&branch_name)?
            .with_context(|| format!("current branch {branch_name} has no tip"))
    }

    /// Move the current branch to `oid`
    pub fn update_head(&self, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_branch(&self.current_branch()?, oid)
    }

    pub fn branch_exists(&self, branch_name: &BranchName) -> bool {
        self.branch_path(branch_name).is_file()
    }

    pub fn read_branch(&self, branch_name: &BranchName) -> anyhow::Result<Option<ObjectId>> {
        let branch_path = self.branch_path(branch_name);

        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {:?}", branch_path))?;

        Ok(Some(ObjectId::try_parse(content.trim().to_string())?))
    }

    pub fn create_branch(&self, name: &BranchName, source_oid: &ObjectId) -> anyhow::Result<()> {
        if self.branch_exists(name) {
            return Err(RepositoryError::AlreadyExists(name.to_string()).into());
        }

        self.update_branch(name, source_oid)
    }

    pub fn update_branch(&self, name: &BranchName, oid: &ObjectId) -> anyhow::Result<()> {
        self.update_ref_file(&self.branch_path(name), oid.to_string())?;
        tracing::debug!(branch = %name, %oid, "branch moved");

        Ok(())
    }

    pub fn delete_branch(&self, name: &BranchName) -> anyhow::Result<ObjectId> {
        let branch_path = self.branch_path(name);

        let oid = self
            .read_branch(name)?
            .ok_or_else(|| RepositoryError::BranchNotFound(name.to_string()))?;

        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {:?}", branch_path))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;

        Ok(oid)
    }

    /// All branch names, sorted
    pub fn list_branches(&self) -> anyhow::Result<Vec<BranchName>> {
        let heads_path = self.heads_path();

        let mut branches = WalkDir::new(&heads_path)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter(|entry| {
                entry.path().extension().and_then(|ext| ext.to_str()) != Some(LOCK_FILE_EXTENSION)
            })
            .filter_map(|entry| {
                let relative_path = entry.path().strip_prefix(&heads_path).ok()?;
                BranchName::try_parse(relative_path.to_string_lossy().to_string()).ok()
            })
            .collect::<Vec<_>>();
        branches.sort();

        Ok(branches)
    }

    fn update_ref_file(&self, path: &Path, raw_ref: String) -> anyhow::Result<()> {
        std::fs::create_dir_all(path.parent().with_context(|| {
            format!(
                "failed to create parent directories for ref file at {:?}",
                path
            )
        })?)?;

        let lock_path = path.with_extension(LOCK_FILE_EXTENSION);
        {
            let mut ref_file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&lock_path)
                .with_context(|| format!("failed to open ref file at {:?}", lock_path))?;
            let mut lock = file_guard::lock(&mut ref_file, Lock::Exclusive, 0, 1)?;
            writeln!(lock.deref_mut(), "{raw_ref}")?;
        }

        std::fs::rename(&lock_path, path)
            .with_context(|| format!("failed to move ref file into place at {:?}", path))
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("failed to remove empty branch directory at {:?}", parent)
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    fn branch_path(&self, name: &BranchName) -> Box<Path> {
        self.heads_path().join(name.as_ref()).into_boxed_path()
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
