//! Sort specifications: ordered path/direction pairs and per-path casts.

use serde::{Deserialize, Serialize};

/// Sort direction for a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first. Documents missing the path sort before all others.
    Ascending,
    /// Largest first. Documents missing the path sort after all others.
    Descending,
}

impl SortOrder {
    /// SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ASC",
            SortOrder::Descending => "DESC",
        }
    }
}

/// Comparison type applied to a path's extracted value.
///
/// Unknown cast names deserialize to [`CastKind::Text`], so a stringly-typed
/// cast policy falls back to text comparison rather than erroring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CastKind {
    /// Integer comparison.
    Bool,
    /// Integer comparison.
    Int,
    /// High-precision decimal comparison, 60 total digits / 30 fractional.
    Float,
    /// Text comparison; the extracted value is compared literally.
    #[default]
    #[serde(other)]
    Text,
}

impl CastKind {
    /// MySQL `CAST` target type for this kind.
    pub fn sql_type(&self) -> &'static str {
        match self {
            CastKind::Bool | CastKind::Int => "SIGNED",
            CastKind::Float => "DECIMAL(60,30)",
            CastKind::Text => "CHAR",
        }
    }
}

/// One sort key: a dotted/indexed path into the document tree plus a
/// direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Dotted/indexed address, e.g. `user.age` or `items.0.price`.
    pub path: String,
    /// Direction for this key.
    pub order: SortOrder,
}

/// An ordered sequence of sort keys.
///
/// Insertion order is semantically significant: the first key is the primary
/// sort, each subsequent key breaks ties left by the keys before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    /// An empty specification. Sorting with it returns the input untouched.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a key, keeping earlier keys at higher precedence.
    pub fn key(mut self, path: impl Into<String>, order: SortOrder) -> Self {
        self.keys.push(SortKey {
            path: path.into(),
            order,
        });
        self
    }

    /// Whether no keys were specified.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of keys, primary included.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Keys in precedence order.
    pub fn iter(&self) -> impl Iterator<Item = &SortKey> {
        self.keys.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, SortOrder)> for SortSpec {
    fn from_iter<I: IntoIterator<Item = (S, SortOrder)>>(iter: I) -> Self {
        Self {
            keys: iter
                .into_iter()
                .map(|(path, order)| SortKey {
                    path: path.into(),
                    order,
                })
                .collect(),
        }
    }
}
