//! sqlx-backed MySQL channel pinned to one connection.

use super::{ChannelError, ExecutionChannel};
use async_trait::async_trait;
use sqlx::{Connection, MySqlConnection, MySqlPool, Row};
use std::fmt;
use tokio::sync::Mutex;

/// [`ExecutionChannel`] over a dedicated `sqlx` MySQL connection.
///
/// The connection is deliberately not pooled per statement: MySQL temporary
/// tables live and die with their session, so every statement of a sort call
/// must reach the same connection.
pub struct MySqlChannel {
    conn: Mutex<MySqlConnection>,
}

impl MySqlChannel {
    /// Opens a new connection from a MySQL URL.
    pub async fn connect(url: &str) -> Result<Self, ChannelError> {
        let conn = MySqlConnection::connect(url)
            .await
            .map_err(|e| ChannelError::with_source("failed to connect to MySQL", e))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Detaches one connection from `pool` for exclusive use.
    ///
    /// The connection no longer counts against the pool and is closed when
    /// the channel is dropped.
    pub async fn from_pool(pool: &MySqlPool) -> Result<Self, ChannelError> {
        let conn = pool
            .acquire()
            .await
            .map_err(|e| ChannelError::with_source("failed to acquire MySQL connection", e))?
            .detach();
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl fmt::Debug for MySqlChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlChannel").finish_non_exhaustive()
    }
}

impl From<sqlx::Error> for ChannelError {
    fn from(error: sqlx::Error) -> Self {
        ChannelError::with_source("MySQL statement failed", error)
    }
}

#[async_trait]
impl ExecutionChannel for MySqlChannel {
    async fn execute(&self, sql: &str, params: Vec<String>) -> Result<u64, ChannelError> {
        let mut conn = self.conn.lock().await;
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param);
        }
        let done = query.execute(&mut *conn).await?;
        Ok(done.rows_affected())
    }

    async fn fetch_all(&self, sql: &str, params: Vec<String>) -> Result<Vec<String>, ChannelError> {
        let mut conn = self.conn.lock().await;
        let mut query = sqlx::query(sql);
        for param in params {
            query = query.bind(param);
        }
        let rows = query.fetch_all(&mut *conn).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>(0).map_err(ChannelError::from))
            .collect()
    }
}
