//! # jsonsort
//!
//! Sorts collections of schema-less JSON documents by one or more field
//! paths, delegating the comparison work to MySQL instead of implementing a
//! multi-key comparator in application memory.
//!
//! Each call serializes the documents into an ephemeral, uniquely named
//! `TEMPORARY TABLE`, builds a multi-key `ORDER BY` over
//! `JSON_EXTRACT` paths with per-path type casts, reads the rows back in
//! engine order, and decodes them. The staging table never outlives the
//! call.
//!
//! ## Architecture
//!
//! - [`sorter`]: the [`JsonSorter`] pipeline entry point
//! - [`spec`]: sort specifications ([`SortSpec`], [`SortOrder`], [`CastKind`])
//! - [`options`]: per-call configuration with defaulting rules
//! - [`channel`]: the execution-channel port and the sqlx MySQL adapter
//! - [`statement`]: SQL text and bound-parameter composition
//! - [`staging`]: staging-table provisioning and guaranteed discard
//! - [`loader`]: document encoding and batched bulk loads
//!
//! ## Example
//!
//! ```no_run
//! use jsonsort::{CastKind, JsonSorter, MySqlChannel, SortOptions, SortOrder, SortSpec};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let channel = MySqlChannel::connect("mysql://root@localhost/test").await?;
//! let sorter = JsonSorter::new(Arc::new(channel));
//!
//! let documents = vec![json!({"user": {"age": 34}}), json!({"user": {"age": 21}})];
//! let spec = SortSpec::new().key("user.age", SortOrder::Ascending);
//! let options = SortOptions::default().with_cast("user.age", CastKind::Int);
//!
//! let sorted = sorter.sort(documents, &spec, &options).await?;
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod error;
pub mod loader;
pub mod options;
pub mod sorter;
pub mod spec;
pub mod staging;
pub mod statement;

pub use channel::{ChannelError, ExecutionChannel, mysql::MySqlChannel};
pub use error::{Result, SortError};
pub use options::SortOptions;
pub use sorter::JsonSorter;
pub use spec::{CastKind, SortKey, SortOrder, SortSpec};
