//! Execution-channel port: the single seam to the database session.

pub mod mysql;

use async_trait::async_trait;
use thiserror::Error;

/// Error reported by an [`ExecutionChannel`] implementation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ChannelError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl ChannelError {
    /// A channel error carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// A channel error chaining an underlying driver error.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// A single database session executing parameterized SQL.
///
/// Statement text is trusted, internally generated clause text; document
/// content only ever travels through `params`, positionally bound and never
/// interpolated.
///
/// The staging table is session-scoped, so one channel instance must address
/// one database session for the whole duration of a sort call.
#[async_trait]
pub trait ExecutionChannel: Send + Sync {
    /// Runs a statement that returns no rows; yields the affected count.
    async fn execute(&self, sql: &str, params: Vec<String>) -> Result<u64, ChannelError>;

    /// Runs a query returning a single text column, in engine row order.
    async fn fetch_all(&self, sql: &str, params: Vec<String>) -> Result<Vec<String>, ChannelError>;
}
