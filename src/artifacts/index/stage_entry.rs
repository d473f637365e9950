use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::objects::object::Packable;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::{Context, anyhow};
use byteorder::{ByteOrder, WriteBytesExt};
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};

const ADDITION_KIND: u8 = 0;
const REMOVAL_KIND: u8 = 1;
const BINARY_OID_SIZE: usize = 20;

/// One pending change recorded in the staging file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEntry {
    Addition { path: PathBuf, oid: ObjectId },
    Removal { path: PathBuf },
}

impl StageEntry {
    pub fn path(&self) -> &Path {
        match self {
            StageEntry::Addition { path, .. } | StageEntry::Removal { path } => path,
        }
    }

    /// Read the next entry, hashing its bytes as it goes
    pub(crate) fn read_from(reader: &mut Checksum) -> anyhow::Result<Self> {
        let kind = reader.read(1)?[0];

        let oid = match kind {
            ADDITION_KIND => {
                let oid_bytes = reader.read(BINARY_OID_SIZE)?;
                Some(ObjectId::read_h40_from(&mut oid_bytes.as_ref())?)
            }
            REMOVAL_KIND => None,
            other => return Err(anyhow!("Invalid staging entry kind {other}")),
        };

        let path_size = byteorder::NetworkEndian::read_u16(&reader.read(2)?) as usize;
        let path_bytes = reader.read(path_size)?;
        let path = String::from_utf8(path_bytes.to_vec())
            .context("Invalid staging entry: path is not UTF-8")?;
        let path = PathBuf::from(path);

        Ok(match oid {
            Some(oid) => StageEntry::Addition { path, oid },
            None => StageEntry::Removal { path },
        })
    }
}

impl Packable for StageEntry {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut entry_bytes = Vec::new();

        match self {
            StageEntry::Addition { oid, .. } => {
                entry_bytes.write_u8(ADDITION_KIND)?;
                oid.write_h40_to(&mut entry_bytes)?;
            }
            StageEntry::Removal { .. } => entry_bytes.write_u8(REMOVAL_KIND)?,
        }

        let path = self.path().to_string_lossy();
        let path_size = u16::try_from(path.len())
            .map_err(|_| anyhow!("Path too long to stage: {}", path))?;
        entry_bytes.write_u16::<byteorder::NetworkEndian>(path_size)?;
        entry_bytes.write_all(path.as_bytes())?;

        Ok(Bytes::from(entry_bytes))
    }
}
