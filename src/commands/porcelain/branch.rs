use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::RepositoryError;

impl Repository {
    /// New branch at the current head; HEAD stays where it is
    pub fn create_branch(&self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(name.to_string())?;
        let head_oid = self.refs().read_head()?;

        self.refs().create_branch(&branch_name, &head_oid)
    }

    /// Drop the branch pointer only; its commits stay in the store
    pub fn delete_branch(&self, name: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(name.to_string())
            .map_err(|_| RepositoryError::BranchNotFound(name.to_string()))?;

        if !self.refs().branch_exists(&branch_name) {
            return Err(RepositoryError::BranchNotFound(name.to_string()).into());
        }
        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::CannotRemoveCurrent(name.to_string()).into());
        }

        let oid = self.refs().delete_branch(&branch_name)?;
        tracing::debug!(branch = %branch_name, %oid, "branch deleted");

        Ok(())
    }
}
