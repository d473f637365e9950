//! Object kinds and the `<type> <len>\0` header that frames every stored object
//!
//! Gitlet stores only two kinds: file content (`blob`) and history (`commit`).
//! Directories are not objects; a commit's snapshot lists full paths.

use anyhow::{Context, anyhow};
use std::io::BufRead;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Commit => "commit",
        }
    }

    /// Consume the header, leaving the reader at the first payload byte
    ///
    /// Returns the kind and the payload length the header declares.
    pub fn read_header(reader: &mut impl BufRead) -> anyhow::Result<(ObjectType, usize)> {
        let object_type = read_field(reader, b' ')?;
        let object_type = ObjectType::try_from(object_type.as_str())?;

        let size = read_field(reader, b'\0')?;
        let size = size
            .parse::<usize>()
            .with_context(|| format!("Invalid {object_type} size {size:?}"))?;

        Ok((object_type, size))
    }
}

fn read_field(reader: &mut impl BufRead, delimiter: u8) -> anyhow::Result<String> {
    let mut field = Vec::new();
    reader.read_until(delimiter, &mut field)?;

    if field.pop() != Some(delimiter) {
        return Err(anyhow!("Truncated object header"));
    }

    String::from_utf8(field).context("Object header is not UTF-8")
}

impl TryFrom<&str> for ObjectType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "commit" => Ok(ObjectType::Commit),
            _ => Err(anyhow!("Invalid object type {value:?}")),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
