//! Snapshot migration and overwrite detection
//!
//! Moving the working area from the `current` snapshot to the `target` one:
//!
//! 1. Every path the two snapshots track differently is compared against the
//!    file actually present in the working area; paths tracked identically are
//!    never touched
//! 2. Files that would lose work are collected as conflicts
//! 3. The remaining changes are planned as add/modify/delete actions
//! 4. Actions are applied only when no conflict was found
//!
//! A working file is safe to replace when its content already equals the
//! target's, or equals what the current snapshot tracks for it (so the content
//! can always be recovered from history).

use crate::areas::repository::Repository;
use crate::artifacts::checkout::conflict::{ConflictMessage, ConflictType};
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Modify existing file
    Modify,
}

/// Set of planned actions grouped by type
pub type ActionsSet = BTreeMap<ActionType, Vec<(PathBuf, Option<ObjectId>)>>;

/// Set of detected conflicts grouped by type
pub type ConflictsSet = BTreeMap<ConflictType, BTreeSet<PathBuf>>;

pub struct Migration<'r> {
    repository: &'r Repository,
    current: &'r Snapshot,
    target: &'r Snapshot,
    actions: ActionsSet,
    conflicts: ConflictsSet,
    planned: bool,
}

impl<'r> Migration<'r> {
    pub fn new(repository: &'r Repository, current: &'r Snapshot, target: &'r Snapshot) -> Self {
        Self {
            repository,
            current,
            target,
            actions: ActionsSet::new(),
            conflicts: ConflictsSet::new(),
            planned: false,
        }
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    pub fn actions_of(
        &self,
        action_type: ActionType,
    ) -> impl Iterator<Item = &(PathBuf, Option<ObjectId>)> {
        self.actions.get(&action_type).into_iter().flatten()
    }

    /// Plan the change set, failing if any working file would lose work
    pub fn plan_changes(&mut self) -> anyhow::Result<()> {
        if self.planned {
            return Ok(());
        }

        let paths = self
            .current
            .keys()
            .chain(self.target.keys())
            .cloned()
            .collect::<BTreeSet<_>>();

        for path in &paths {
            self.plan_path(path)?;
        }
        self.planned = true;

        tracing::debug!(
            added = self.actions_of(ActionType::Add).count(),
            modified = self.actions_of(ActionType::Modify).count(),
            deleted = self.actions_of(ActionType::Delete).count(),
            conflicts = self.conflicts.values().map(BTreeSet::len).sum::<usize>(),
            "migration planned"
        );

        if self.conflicts.is_empty() {
            return Ok(());
        }

        let paths = self
            .conflicts
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Err(RepositoryError::UncommittedChangesWouldBeOverwritten {
            paths,
            report: self.collect_errors().join("\n\n"),
        }
        .into())
    }

    /// Plan (if not done yet) and rewrite the working area
    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.plan_changes()?;
        self.repository.workspace().apply_migration(self)
    }

    fn plan_path(&mut self, path: &Path) -> anyhow::Result<()> {
        let repository = self.repository;
        let workspace = repository.workspace();
        let (current, target) = (self.current, self.target);
        let old_oid = current.get(path);
        let new_oid = target.get(path);

        // untouched by the migration, whatever the working area holds
        if old_oid == new_oid {
            return Ok(());
        }

        match new_oid {
            Some(new_oid) => {
                if workspace.is_dir(path) {
                    if self.dir_holds_untracked_work(path)? {
                        self.record_conflict(ConflictType::StaleDirectory, path);
                    } else {
                        self.record_action(ActionType::Add, path, Some(new_oid.clone()));
                    }
                    return Ok(());
                }

                let workspace_oid = workspace.hash_file(path)?;
                match workspace_oid {
                    Some(ref oid) if oid == new_oid => {}
                    Some(ref oid) if Some(oid) != old_oid => {
                        self.record_conflict(ConflictType::for_file(old_oid.is_some()), path);
                    }
                    Some(_) => self.record_action(ActionType::Modify, path, Some(new_oid.clone())),
                    None => {
                        self.check_blocking_parent(path)?;
                        self.record_action(ActionType::Add, path, Some(new_oid.clone()));
                    }
                }
            }
            None => match workspace.hash_file(path)? {
                Some(ref oid) if Some(oid) != old_oid => {
                    self.record_conflict(ConflictType::StaleFile, path);
                }
                Some(_) => self.record_action(ActionType::Delete, path, None),
                None => {}
            },
        }

        Ok(())
    }

    // A file at `a` blocks writing `a/b`. It goes away with the migration only if
    // the current snapshot tracks it with its present content.
    fn check_blocking_parent(&mut self, path: &Path) -> anyhow::Result<()> {
        let repository = self.repository;
        let workspace = repository.workspace();
        let current = self.current;

        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() || !workspace.is_file(ancestor) {
                continue;
            }

            let tracked_oid = current.get(ancestor);
            if workspace.hash_file(ancestor)?.as_ref() != tracked_oid {
                self.record_conflict(ConflictType::for_file(tracked_oid.is_some()), ancestor);
            }
        }

        Ok(())
    }

    fn dir_holds_untracked_work(&self, dir_path: &Path) -> anyhow::Result<bool> {
        let workspace = self.repository.workspace();

        for file_path in workspace.list_files_under(dir_path)? {
            if workspace.hash_file(&file_path)?.as_ref() != self.current.get(&file_path) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn record_action(&mut self, action_type: ActionType, path: &Path, oid: Option<ObjectId>) {
        self.actions
            .entry(action_type)
            .or_default()
            .push((path.to_path_buf(), oid));
    }

    fn record_conflict(&mut self, conflict_type: ConflictType, path: &Path) {
        self.conflicts
            .entry(conflict_type)
            .or_default()
            .insert(path.to_path_buf());
    }

    fn collect_errors(&self) -> Vec<String> {
        self.conflicts
            .iter()
            .filter(|(_, paths)| !paths.is_empty())
            .map(|(conflict_type, paths)| {
                let paths = paths
                    .iter()
                    .map(|p| format!("\t{}", p.display()))
                    .collect::<Vec<String>>();

                let ConflictMessage { header, footer } = conflict_type.into();
                format!("{}\n{}\n{}", header, paths.join("\n"), footer)
            })
            .collect::<Vec<_>>()
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.repository.database().load_blob_content(object_id)
    }
}
