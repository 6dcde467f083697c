//! Document encoding and batched loading into the staging table.

use crate::channel::ExecutionChannel;
use crate::error::{Result, SortError};
use crate::staging::StagingStore;
use crate::statement;
use serde::Serialize;
use tracing::debug;

/// Encodes every document to canonical JSON text.
///
/// The first document that fails to serialize aborts the whole operation;
/// nothing is partially loaded.
pub fn encode_documents<T: Serialize>(documents: &[T]) -> Result<Vec<String>> {
    documents
        .iter()
        .enumerate()
        .map(|(index, document)| {
            serde_json::to_string(document).map_err(|source| SortError::Encoding { index, source })
        })
        .collect()
}

/// Loads encoded documents in consecutive batches of at most `insert_buffer`.
///
/// Each batch is one parameter-bound bulk insert. Insertion order carries no
/// meaning for the result (ordering happens at read time), so a batch is
/// just a size bound. A failed insert aborts with no retry; the caller
/// discards the staging table, so a partial load never outlives the call.
pub async fn load(
    channel: &dyn ExecutionChannel,
    store: &StagingStore,
    encoded: &[String],
    insert_buffer: usize,
) -> Result<()> {
    let batch_size = insert_buffer.max(1);
    for (batch, chunk) in encoded.chunks(batch_size).enumerate() {
        let insert = statement::insert_batch(store.name(), chunk);
        channel
            .execute(&insert.sql, insert.params)
            .await
            .map_err(|source| SortError::Load { batch, source })?;
        debug!(batch, rows = chunk.len(), "loaded staging batch");
    }
    Ok(())
}
