//! Per-call configuration with field-by-field defaulting.

use crate::spec::CastKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default staging collation: Unicode-aware, case-insensitive.
pub const DEFAULT_CHARSET: &str = "utf8mb4_unicode_ci";

/// Default maximum number of documents per bulk-load batch.
pub const DEFAULT_INSERT_BUFFER: usize = 500;

/// Options for a single sort call.
///
/// Unset fields take their defaults when deserializing a partial options
/// document; caller-supplied values always win. Values are not validated
/// here; a malformed collation name surfaces as an engine error when the
/// staging table is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortOptions {
    /// Collation for the staging table.
    pub charset: String,
    /// Maximum documents per bulk insert. Clamped to at least 1 at use.
    pub insert_buffer: usize,
    /// Per-path comparison types; unlisted paths compare as text.
    pub cast: HashMap<String, CastKind>,
}

impl Default for SortOptions {
    fn default() -> Self {
        Self {
            charset: DEFAULT_CHARSET.to_string(),
            insert_buffer: DEFAULT_INSERT_BUFFER,
            cast: HashMap::new(),
        }
    }
}

impl SortOptions {
    /// Replaces the staging collation.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Replaces the bulk-load batch size.
    pub fn with_insert_buffer(mut self, insert_buffer: usize) -> Self {
        self.insert_buffer = insert_buffer;
        self
    }

    /// Declares a comparison type for one path.
    pub fn with_cast(mut self, path: impl Into<String>, kind: CastKind) -> Self {
        self.cast.insert(path.into(), kind);
        self
    }

    /// Comparison type for `path`; text when the path was not declared.
    pub fn cast_for(&self, path: &str) -> CastKind {
        self.cast.get(path).copied().unwrap_or_default()
    }
}
