//! Global commit journal
//!
//! Every commit ever created is recorded here, independently of which branches
//! still reach it. `global-log` and `find` read it; nothing ever removes an
//! entry.
//!
//! ## File Format
//!
//! `.gitlet/commits` holds one 40-hex commit id per line, in creation order.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::Path;

#[derive(Debug)]
pub struct CommitIndex {
    path: Box<Path>,
}

impl CommitIndex {
    pub fn new(path: Box<Path>) -> Self {
        CommitIndex { path }
    }

    /// All recorded commit ids, oldest first
    pub fn list(&self) -> anyhow::Result<Vec<ObjectId>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Unable to read commit journal {}", self.path.display()))?;

        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| ObjectId::try_parse(line.to_string()))
            .collect()
    }

    /// Record `oid`; already recorded ids are left alone
    pub fn append(&self, oid: &ObjectId) -> anyhow::Result<()> {
        let mut journal = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Unable to open commit journal {}", self.path.display()))?;
        let mut lock = file_guard::lock(&mut journal, Lock::Exclusive, 0, 1)?;

        if self.list()?.contains(oid) {
            return Ok(());
        }

        writeln!(lock.deref_mut(), "{oid}")
            .with_context(|| format!("Unable to append to {}", self.path.display()))?;
        tracing::debug!(%oid, "commit journaled");

        Ok(())
    }
}
