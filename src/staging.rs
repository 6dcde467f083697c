//! Staging-table provisioning and discard.

use crate::channel::ExecutionChannel;
use crate::error::{Result, SortError};
use crate::statement;
use tracing::{debug, warn};

/// Handle over the ephemeral table holding encoded documents for one call.
///
/// Names are UUIDv7-derived: globally unique (concurrent calls on the same
/// engine cannot collide) and time-ordered, so stray tables sort by creation
/// time if ever inspected. The sorter discards the store on every exit path
/// after a successful [`provision`](StagingStore::provision); the engine
/// additionally drops temporary tables when their session ends.
#[derive(Debug)]
pub struct StagingStore {
    name: String,
}

impl StagingStore {
    /// Creates the staging table under a freshly generated name.
    pub async fn provision(channel: &dyn ExecutionChannel, charset: &str) -> Result<Self> {
        let name = format!("sort_{}", uuid::Uuid::now_v7().simple());
        let sql = statement::create_staging_table(&name, charset);
        channel
            .execute(&sql, Vec::new())
            .await
            .map_err(SortError::StoreCreation)?;
        debug!(table = %name, "provisioned staging table");
        Ok(Self { name })
    }

    /// The generated table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Drops the staging table, best-effort.
    ///
    /// Runs on success and failure paths alike. A failed drop is logged at
    /// `warn` and otherwise ignored; the table dies with the session.
    pub async fn discard(self, channel: &dyn ExecutionChannel) {
        let sql = statement::drop_staging_table(&self.name);
        match channel.execute(&sql, Vec::new()).await {
            Ok(_) => debug!(table = %self.name, "dropped staging table"),
            Err(error) => warn!(table = %self.name, %error, "failed to drop staging table"),
        }
    }
}
