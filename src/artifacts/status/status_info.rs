use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Snapshot;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;
pub type FileSet = BTreeSet<PathBuf>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) current_branch: BranchName,
    pub(crate) branches: Vec<BranchName>,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

// Terminology:
// - staged: pending additions in the staging area
// - removed: pending removals in the staging area
// - modified: tracked or staged files whose working content differs from what
//   would be committed
// - deleted: tracked or staged files missing from the working area
// - untracked: working files that are neither staged nor tracked
impl<'r> Status<'r> {
    pub fn initialize(&self, index: &Index) -> anyhow::Result<StatusInfo> {
        let current_branch = self.repository.refs().current_branch()?;
        let branches = self.repository.refs().list_branches()?;
        let (_, head_commit) = self.repository.head_commit()?;
        let head_snapshot = head_commit.snapshot();

        let workspace_changeset = self.collect_workspace_changes(head_snapshot, index)?;
        let untracked_files = self.collect_untracked_files(head_snapshot, index)?;

        Ok(StatusInfo {
            current_branch,
            branches,
            staged_files: index.additions().keys().cloned().collect(),
            removed_files: index.removals().clone(),
            workspace_changeset,
            untracked_files,
        })
    }

    fn collect_workspace_changes(
        &self,
        head_snapshot: &Snapshot,
        index: &Index,
    ) -> anyhow::Result<ChangeSet> {
        let workspace = self.repository.workspace();
        let mut changeset = ChangeSet::new();

        // the staged content wins over the tracked one
        let mut expected = head_snapshot
            .iter()
            .filter(|(path, _)| !index.is_staged_for_removal(path))
            .collect::<BTreeMap<_, _>>();
        expected.extend(index.additions().iter());

        for (path, oid) in expected {
            match workspace.hash_file(path)? {
                Some(ref workspace_oid) if workspace_oid != oid => {
                    changeset.insert(path.clone(), WorkspaceChangeType::Modified);
                }
                Some(_) => {}
                None => {
                    changeset.insert(path.clone(), WorkspaceChangeType::Deleted);
                }
            }
        }

        Ok(changeset)
    }

    fn collect_untracked_files(
        &self,
        head_snapshot: &Snapshot,
        index: &Index,
    ) -> anyhow::Result<FileSet> {
        let untracked_files = self
            .repository
            .workspace()
            .list_files()?
            .into_iter()
            .filter(|path| {
                !index.is_staged_for_addition(path)
                    && (!head_snapshot.contains_key(path) || index.is_staged_for_removal(path))
            })
            .collect();

        Ok(untracked_files)
    }
}

impl StatusInfo {
    fn write_section<I, T>(f: &mut fmt::Formatter<'_>, title: &str, lines: I) -> fmt::Result
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        writeln!(f, "=== {title} ===")?;
        for line in lines {
            writeln!(f, "{line}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for StatusInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let branches = self.branches.iter().map(|branch| {
            if *branch == self.current_branch {
                format!("*{branch}")
            } else {
                branch.to_string()
            }
        });
        Self::write_section(f, "Branches", branches)?;

        Self::write_section(
            f,
            "Staged Files",
            self.staged_files.iter().map(|path| path.display()),
        )?;
        Self::write_section(
            f,
            "Removed Files",
            self.removed_files.iter().map(|path| path.display()),
        )?;
        Self::write_section(
            f,
            "Modifications Not Staged For Commit",
            self.workspace_changeset
                .iter()
                .map(|(path, change)| format!("{} {change}", path.display())),
        )?;
        Self::write_section(
            f,
            "Untracked Files",
            self.untracked_files.iter().map(|path| path.display()),
        )
    }
}
