//! SQL statement composition for the staging table.
//!
//! Everything here produces either pure statement text (clause structure,
//! identifiers, and JSON path literals are all internally generated) or a
//! [`Statement`] pairing text with positionally bound parameters. Document
//! content is only ever carried in parameters.

use crate::options::SortOptions;
use crate::spec::{CastKind, SortSpec};

/// Statement text plus its bound parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// SQL text with `?` placeholders.
    pub sql: String,
    /// Values for the placeholders, in order.
    pub params: Vec<String>,
}

/// DDL provisioning a staging table with a single JSON column.
pub fn create_staging_table(name: &str, charset: &str) -> String {
    format!(
        "CREATE TEMPORARY TABLE {} (`doc` JSON NOT NULL) COLLATE={charset}",
        quote_ident(name)
    )
}

/// DDL discarding a staging table.
pub fn drop_staging_table(name: &str) -> String {
    format!("DROP TEMPORARY TABLE IF EXISTS {}", quote_ident(name))
}

/// Bulk insert for one batch of encoded documents, one placeholder each.
pub fn insert_batch(table: &str, documents: &[String]) -> Statement {
    let placeholders = vec!["(?)"; documents.len()].join(", ");
    Statement {
        sql: format!(
            "INSERT INTO {} (`doc`) VALUES {placeholders}",
            quote_ident(table)
        ),
        params: documents.to_vec(),
    }
}

/// Read of the staging table in sorted order.
///
/// One clause per sort key, in specification order: the first key is the
/// primary sort, each later key breaks ties. A path absent from a document
/// extracts to SQL NULL, which MySQL orders before all values for `ASC` and
/// after all values for `DESC`.
pub fn select_sorted(table: &str, spec: &SortSpec, options: &SortOptions) -> String {
    let clauses: Vec<String> = spec
        .iter()
        .map(|key| {
            format!(
                "{} {}",
                order_expr(&key.path, options.cast_for(&key.path)),
                key.order.as_sql()
            )
        })
        .collect();
    format!(
        "SELECT CAST(`doc` AS CHAR) FROM {} ORDER BY {}",
        quote_ident(table),
        clauses.join(", ")
    )
}

/// Extraction-and-cast expression for one sort key.
fn order_expr(path: &str, cast: CastKind) -> String {
    format!(
        "CAST(JSON_UNQUOTE(JSON_EXTRACT(`doc`, {})) AS {})",
        quote_text(&json_path(path)),
        cast.sql_type()
    )
}

/// Renders a dotted/indexed caller path into MySQL JSON path syntax.
///
/// All-digit segments address array elements (`items.0.price` becomes
/// `$.items[0].price`); member names that are not plain identifiers are
/// double-quoted with escaping.
pub(crate) fn json_path(path: &str) -> String {
    let mut out = String::from("$");
    for segment in path.split('.') {
        if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
            out.push('[');
            out.push_str(segment);
            out.push(']');
        } else if is_identifier(segment) {
            out.push('.');
            out.push_str(segment);
        } else {
            out.push_str(".\"");
            out.push_str(&segment.replace('\\', "\\\\").replace('"', "\\\""));
            out.push('"');
        }
    }
    out
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Back-tick identifier quoting, doubling embedded back-ticks.
fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Single-quoted SQL string literal with `\` and `'` escaped.
fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "''"))
}
