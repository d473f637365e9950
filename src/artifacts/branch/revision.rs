use crate::areas::database::Database;
use crate::artifacts::branch::MIN_ABBREVIATED_ID_LENGTH;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::RepositoryError;

/// A commit named by its id, full or abbreviated
///
/// Abbreviations must be at least [`MIN_ABBREVIATED_ID_LENGTH`] hex characters
/// and match exactly one stored commit. Blobs sharing the prefix are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision(String);

impl Revision {
    pub fn try_parse(revision: &str) -> anyhow::Result<Self> {
        let looks_like_oid = (MIN_ABBREVIATED_ID_LENGTH..=OBJECT_ID_LENGTH)
            .contains(&revision.len())
            && revision.chars().all(|c| c.is_ascii_hexdigit());

        if !looks_like_oid {
            return Err(RepositoryError::NoSuchCommit(revision.to_string()).into());
        }

        Ok(Self(revision.to_ascii_lowercase()))
    }

    pub fn resolve(&self, database: &Database) -> anyhow::Result<ObjectId> {
        let commits = database
            .find_objects_by_prefix(&self.0)?
            .into_iter()
            .filter(|oid| {
                database
                    .get_object_type(oid)
                    .map(|object_type| object_type == ObjectType::Commit)
                    .unwrap_or(false)
            })
            .collect::<Vec<_>>();

        match commits.as_slice() {
            [] => Err(RepositoryError::NoSuchCommit(self.0.clone()).into()),
            [oid] => Ok(oid.clone()),
            candidates => Err(RepositoryError::AmbiguousCommit {
                prefix: self.0.clone(),
                candidates: candidates.iter().map(ObjectId::to_short_oid).collect(),
            }
            .into()),
        }
    }
}

impl AsRef<str> for Revision {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::commit::Commit;
    use assert_fs::TempDir;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("abc")]
    #[case("not-hex")]
    #[case("")]
    fn rejects_ids_that_cannot_name_a_commit(#[case] revision: &str) {
        let error = Revision::try_parse(revision).unwrap_err();

        assert_eq!(
            error.downcast_ref::<RepositoryError>(),
            Some(&RepositoryError::NoSuchCommit(revision.to_string()))
        );
    }

    #[test]
    fn resolves_full_and_abbreviated_ids() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        let oid = database.store(&Commit::root()).unwrap();

        let full = Revision::try_parse(oid.as_ref()).unwrap();
        let short = Revision::try_parse(&oid.as_ref()[..8].to_uppercase()).unwrap();

        assert_eq!(full.resolve(&database).unwrap(), oid);
        assert_eq!(short.resolve(&database).unwrap(), oid);
    }

    #[test]
    fn blobs_are_not_commits() {
        let dir = TempDir::new().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        let oid = database.store(&Blob::new(Bytes::from_static(b"hello"))).unwrap();

        let error = Revision::try_parse(oid.as_ref())
            .unwrap()
            .resolve(&database)
            .unwrap_err();

        assert!(matches!(
            error.downcast_ref::<RepositoryError>(),
            Some(RepositoryError::NoSuchCommit(_))
        ));
    }
}
