//! Commit object
//!
//! A commit records a complete snapshot of every tracked path, the moment it
//! was taken, a message, and links to its parents:
//! - 0 parents for the root commit
//! - 1 parent for an ordinary commit
//! - 2 parents for a merge commit (`[into, in]`)
//!
//! ## Format
//!
//! On disk:
//! ```text
//! commit <size>\0
//! parent <parent-sha>
//! timestamp <unix-seconds> <timezone>
//! entry <blob-sha> <path>
//!
//! <commit message>
//! ```
//!
//! Entries are written in path order, so equal commits always serialize (and
//! therefore hash) to the same bytes.

use crate::artifacts::objects::object::{Object, Packable, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// Tracked path -> blob id
pub type Snapshot = BTreeMap<PathBuf, ObjectId>;

pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

const READABLE_TIMESTAMP_FORMAT: &str = "%a %b %-d %H:%M:%S %Y %z";

/// Slim representation of a commit
///
/// Just what graph walks need: identity, parent links and time.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Vec<ObjectId>,
    pub timestamp: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    parents: Vec<ObjectId>,
    timestamp: DateTime<FixedOffset>,
    message: String,
    snapshot: Snapshot,
}

impl Commit {
    pub fn new(
        parents: Vec<ObjectId>,
        timestamp: DateTime<FixedOffset>,
        message: String,
        snapshot: Snapshot,
    ) -> Self {
        Commit {
            parents,
            timestamp,
            message,
            snapshot,
        }
    }

    /// The parentless commit every repository starts from
    pub fn root() -> Self {
        let epoch = DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset();
        Commit::new(
            Vec::new(),
            epoch,
            ROOT_COMMIT_MESSAGE.to_string(),
            Snapshot::new(),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn short_message(&self) -> String {
        self.message.lines().next().unwrap_or("").to_string()
    }

    pub fn parents(&self) -> &[ObjectId] {
        &self.parents
    }

    /// First parent, the one `log` follows
    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.first()
    }

    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Timestamp as shown by `log`, e.g. "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp.format(READABLE_TIMESTAMP_FORMAT).to_string()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }

    pub fn tracks(&self, path: &Path) -> Option<&ObjectId> {
        self.snapshot.get(path)
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents.clone(),
            timestamp: self.timestamp,
        }
    }

    fn payload(&self) -> String {
        let mut lines = vec![];

        for parent in &self.parents {
            lines.push(format!("parent {}", parent.as_ref()));
        }
        lines.push(format!(
            "timestamp {} {}",
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        ));
        for (path, oid) in &self.snapshot {
            lines.push(format!("entry {} {}", oid.as_ref(), path.to_string_lossy()));
        }
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}

fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, timezone) = value
        .split_once(' ')
        .context("Invalid commit object: malformed timestamp")?;
    let seconds = seconds
        .parse::<i64>()
        .context("Invalid commit object: timestamp is not a number")?;

    let sign = match timezone.get(..1) {
        Some("-") => -1,
        Some("+") => 1,
        _ => anyhow::bail!("Invalid commit object: malformed timezone {timezone}"),
    };
    let hours = timezone
        .get(1..3)
        .and_then(|hours| hours.parse::<i32>().ok())
        .context("Invalid commit object: malformed timezone hours")?;
    let minutes = timezone
        .get(3..5)
        .and_then(|minutes| minutes.parse::<i32>().ok())
        .context("Invalid commit object: malformed timezone minutes")?;
    let offset = FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
        .context("Invalid commit object: timezone out of range")?;

    Ok(DateTime::from_timestamp(seconds, 0)
        .context("Invalid commit object: timestamp out of range")?
        .with_timezone(&offset))
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        frame(self.object_type(), self.payload().as_bytes())
    }
}

impl Unpackable for Commit {
    fn deserialize(mut reader: impl BufRead) -> anyhow::Result<Self> {
        let mut content = String::new();
        reader
            .read_to_string(&mut content)
            .context("Invalid commit object: payload is not UTF-8")?;

        let (header, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut parents = Vec::new();
        let mut timestamp = None;
        let mut snapshot = Snapshot::new();

        for line in header.lines() {
            if let Some(parent) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent.to_string())?);
            } else if let Some(value) = line.strip_prefix("timestamp ") {
                timestamp = Some(parse_timestamp(value)?);
            } else if let Some(entry) = line.strip_prefix("entry ") {
                let (oid, path) = entry
                    .split_once(' ')
                    .context("Invalid commit object: malformed entry line")?;
                snapshot.insert(PathBuf::from(path), ObjectId::try_parse(oid.to_string())?);
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {line:?}");
            }
        }

        let timestamp = timestamp.context("Invalid commit object: missing timestamp line")?;

        Ok(Self::new(parents, timestamp, message.to_string(), snapshot))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn display(&self) -> String {
        self.payload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_type::ObjectType;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn oid(fill: char) -> ObjectId {
        ObjectId::try_parse(fill.to_string().repeat(40)).unwrap()
    }

    fn sample_commit() -> Commit {
        let timestamp =
            DateTime::parse_from_str("2023-01-01 12:00:00 +0200", "%Y-%m-%d %H:%M:%S %z").unwrap();
        let snapshot = Snapshot::from([
            (PathBuf::from("b.txt"), oid('b')),
            (PathBuf::from("a dir/a.txt"), oid('a')),
        ]);

        Commit::new(
            vec![oid('1'), oid('2')],
            timestamp,
            "Merged other into master.\n\nsecond paragraph".to_string(),
            snapshot,
        )
    }

    #[test]
    fn reads_back_what_it_wrote() {
        let commit = sample_commit();
        let bytes = commit.serialize().unwrap();

        let mut reader = Cursor::new(bytes);
        let (object_type, _) = ObjectType::read_header(&mut reader).unwrap();
        assert_eq!(object_type, ObjectType::Commit);
        let parsed = Commit::deserialize(reader).unwrap();

        assert_eq!(parsed, commit);
        assert_eq!(parsed.object_id().unwrap(), commit.object_id().unwrap());
    }

    #[test]
    fn any_field_change_changes_the_id() {
        let commit = sample_commit();
        let reworded = Commit::new(
            commit.parents().to_vec(),
            commit.timestamp(),
            "another message".to_string(),
            commit.snapshot().clone(),
        );

        assert_ne!(commit.object_id().unwrap(), reworded.object_id().unwrap());
    }

    #[test]
    fn root_commit_is_stable() {
        let root = Commit::root();

        assert_eq!(root.message(), ROOT_COMMIT_MESSAGE);
        assert!(root.parents().is_empty());
        assert!(root.snapshot().is_empty());
        assert_eq!(root.readable_timestamp(), "Thu Jan 1 00:00:00 1970 +0000");
        assert_eq!(
            Commit::root().object_id().unwrap(),
            root.object_id().unwrap()
        );
    }
}
