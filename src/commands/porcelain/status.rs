use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use std::io::Write;

impl Repository {
    pub async fn status(&self) -> anyhow::Result<StatusInfo> {
        self.ensure_initialized()?;

        let index = self.index();
        let mut index = index.lock().await;
        index.rehydrate()?;

        let status_info = Status::new(self).initialize(&index)?;
        write!(self.writer(), "{status_info}")?;

        Ok(status_info)
    }
}
