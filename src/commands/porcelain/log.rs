use crate::areas::repository::Repository;
use crate::artifacts::log::format_commit_record;
use crate::artifacts::log::rev_list::RevList;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::RepositoryError;
use std::io::Write;

impl Repository {
    /// First-parent history of the current branch, newest first
    pub fn log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;
        let head_oid = self.refs().read_head()?;

        for entry in RevList::new(self.database(), head_oid) {
            let (oid, commit) = entry?;
            write!(self.writer(), "{}", format_commit_record(&oid, &commit))?;
        }

        Ok(())
    }

    /// Every commit ever created, in creation order
    pub fn global_log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        for oid in self.commit_index().list()? {
            let commit = self.database().load_commit(&oid)?;
            write!(self.writer(), "{}", format_commit_record(&oid, &commit))?;
        }

        Ok(())
    }

    /// Ids of the commits whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<Vec<ObjectId>> {
        self.ensure_initialized()?;

        let mut matches = Vec::new();
        for oid in self.commit_index().list()? {
            if self.database().load_commit(&oid)?.message() == message {
                matches.push(oid);
            }
        }

        if matches.is_empty() {
            return Err(RepositoryError::NoCommitWithMessage(message.to_string()).into());
        }

        for oid in &matches {
            writeln!(self.writer(), "{oid}")?;
        }

        Ok(matches)
    }
}
