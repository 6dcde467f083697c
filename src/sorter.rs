//! The sort pipeline: provision, load, read in engine order, decode.

use crate::channel::ExecutionChannel;
use crate::error::{Result, SortError};
use crate::loader;
use crate::options::SortOptions;
use crate::spec::SortSpec;
use crate::staging::StagingStore;
use crate::statement;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Sorts document collections through a database engine.
///
/// The sorter holds no state between calls; concurrent calls sharing one
/// engine are isolated purely by each call's uniquely named staging table.
#[derive(Clone)]
pub struct JsonSorter {
    channel: Arc<dyn ExecutionChannel>,
}

impl fmt::Debug for JsonSorter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSorter").finish_non_exhaustive()
    }
}

impl JsonSorter {
    /// Builds a sorter over one execution channel (one database session).
    pub fn new(channel: Arc<dyn ExecutionChannel>) -> Self {
        Self { channel }
    }

    /// Sorts `documents` by `spec`, primary key first.
    ///
    /// An empty `spec` returns the input unchanged without touching the
    /// channel. Otherwise the result has the same cardinality as the input
    /// and is a permutation of it, ordered exactly as the engine returned
    /// it. Any failure after the staging table exists still discards it
    /// before the error propagates.
    pub async fn sort<T>(
        &self,
        documents: Vec<T>,
        spec: &SortSpec,
        options: &SortOptions,
    ) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        if spec.is_empty() {
            return Ok(documents);
        }

        let channel = self.channel.as_ref();
        let store = StagingStore::provision(channel, &options.charset).await?;
        let result = self.run(&store, &documents, spec, options).await;
        store.discard(channel).await;
        result
    }

    async fn run<T>(
        &self,
        store: &StagingStore,
        documents: &[T],
        spec: &SortSpec,
        options: &SortOptions,
    ) -> Result<Vec<T>>
    where
        T: Serialize + DeserializeOwned,
    {
        let channel = self.channel.as_ref();

        let encoded = loader::encode_documents(documents)?;
        loader::load(channel, store, &encoded, options.insert_buffer).await?;

        let select = statement::select_sorted(store.name(), spec, options);
        let rows = channel
            .fetch_all(&select, Vec::new())
            .await
            .map_err(SortError::InvalidSortSpec)?;
        debug!(rows = rows.len(), "read staging table in sorted order");

        rows.iter()
            .enumerate()
            .map(|(row, text)| {
                serde_json::from_str(text).map_err(|source| SortError::Decoding { row, source })
            })
            .collect()
    }
}
