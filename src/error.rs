//! Error types for the sort pipeline.

use crate::channel::ChannelError;
use thiserror::Error;

/// Failure of a single sort call.
///
/// Every variant is fatal for the call that produced it: nothing is retried,
/// no partial result is returned, and the staging table (if one was created)
/// is discarded before the error reaches the caller.
#[derive(Error, Debug)]
pub enum SortError {
    /// Provisioning the staging table failed; nothing was created.
    #[error("failed to provision staging table: {0}")]
    StoreCreation(#[source] ChannelError),

    /// A document could not be serialized; nothing was loaded.
    #[error("failed to encode document at index {index}: {source}")]
    Encoding {
        /// Position of the offending document in the input sequence.
        index: usize,
        /// Underlying serializer error.
        source: serde_json::Error,
    },

    /// A bulk insert failed part-way through loading.
    #[error("failed to load batch {batch} into staging table: {source}")]
    Load {
        /// Zero-based index of the failed batch.
        batch: usize,
        /// Underlying channel error.
        source: ChannelError,
    },

    /// A row read back from the staging table did not decode.
    ///
    /// Only this crate's own encoded output is ever stored, so this is an
    /// internal-consistency fault rather than a user input error.
    #[error("failed to decode row {row} read back from staging table: {source}")]
    Decoding {
        /// Zero-based index of the row in engine order.
        row: usize,
        /// Underlying deserializer error.
        source: serde_json::Error,
    },

    /// The engine rejected the generated ordering clause at execution time.
    ///
    /// Paths, directions, and casts are not validated ahead of execution;
    /// whatever the engine reports is surfaced here.
    #[error("sort specification rejected by the engine: {0}")]
    InvalidSortSpec(#[source] ChannelError),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SortError>;
