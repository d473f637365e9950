#[derive(Debug)]
pub struct ConflictMessage {
    pub header: &'static str,
    pub footer: &'static str,
}

impl From<&ConflictType> for ConflictMessage {
    fn from(value: &ConflictType) -> Self {
        match value {
            ConflictType::StaleFile => Self {
                header: "Your local changes to the following files would be overwritten:",
                footer: "Please commit your changes before you switch branches.",
            },
            ConflictType::StaleDirectory => Self {
                header: "Updating the following directories would lose untracked files in them:",
                footer: "Please move or remove them first.",
            },
            ConflictType::UntrackedOverwritten => Self {
                header: "The following untracked working files would be overwritten:",
                footer: "There is an untracked file in the way; delete it, or add and commit it first.",
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConflictType {
    /// Tracked file whose working copy has unsaved edits
    StaleFile,
    /// Directory holding untracked work where a file must go
    StaleDirectory,
    /// Untracked file sitting where a tracked one must go
    UntrackedOverwritten,
}

impl ConflictType {
    pub fn for_file(tracked: bool) -> ConflictType {
        if tracked {
            ConflictType::StaleFile
        } else {
            ConflictType::UntrackedOverwritten
        }
    }
}
