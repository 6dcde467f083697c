//! In-memory stand-in for the MySQL session.
//!
//! `FakeMySql` records every statement it receives, keeps staging tables as
//! plain row vectors, and emulates just enough of the engine to answer the
//! generated `SELECT … ORDER BY` reads: JSON path extraction, unquoting,
//! `SIGNED` / `DECIMAL(60,30)` / `CHAR` casts, and NULL-first (ASC) /
//! NULL-last (DESC) ordering. Failures and corrupt read-backs can be
//! injected per call site.

#![allow(dead_code)]

use async_trait::async_trait;
use jsonsort::{ChannelError, ExecutionChannel};
use serde_json::Value;
use sqlx::types::BigDecimal;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

/// One recorded channel call.
#[derive(Clone, Debug)]
pub struct Call {
    pub sql: String,
    pub params: Vec<String>,
}

/// Which statement to reject with an injected failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Create,
    /// Reject the bulk insert with this zero-based batch index.
    Insert(usize),
    Select,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    tables: HashMap<String, Vec<String>>,
    fail: Option<FailOn>,
    corrupt_reads: bool,
    inserts_seen: usize,
}

/// Scripted in-memory execution channel.
pub struct FakeMySql {
    state: Mutex<State>,
}

impl FakeMySql {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(State::default()),
        })
    }

    pub fn fail_on(&self, target: FailOn) {
        self.state.lock().unwrap().fail = Some(target);
    }

    pub fn corrupt_reads(&self) {
        self.state.lock().unwrap().corrupt_reads = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }

    pub fn insert_call_count(&self) -> usize {
        self.state
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| c.sql.starts_with("INSERT INTO "))
            .count()
    }

    /// Staging tables still provisioned, i.e. leaked if nonzero after a call.
    pub fn live_table_count(&self) -> usize {
        self.state.lock().unwrap().tables.len()
    }
}

#[async_trait]
impl ExecutionChannel for FakeMySql {
    async fn execute(&self, sql: &str, params: Vec<String>) -> Result<u64, ChannelError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            sql: sql.to_string(),
            params: params.clone(),
        });

        if let Some(rest) = sql.strip_prefix("CREATE TEMPORARY TABLE `") {
            if state.fail == Some(FailOn::Create) {
                return Err(ChannelError::new("injected: create rejected"));
            }
            let name = table_name(rest)?;
            state.tables.insert(name, Vec::new());
            Ok(0)
        } else if let Some(rest) = sql.strip_prefix("INSERT INTO `") {
            let batch = state.inserts_seen;
            state.inserts_seen += 1;
            if state.fail == Some(FailOn::Insert(batch)) {
                return Err(ChannelError::new("injected: insert rejected"));
            }
            let name = table_name(rest)?;
            let rows = state
                .tables
                .get_mut(&name)
                .ok_or_else(|| ChannelError::new(format!("no such table `{name}`")))?;
            let affected = params.len() as u64;
            rows.extend(params);
            Ok(affected)
        } else if let Some(rest) = sql.strip_prefix("DROP TEMPORARY TABLE IF EXISTS `") {
            let name = table_name(rest)?;
            state.tables.remove(&name);
            Ok(0)
        } else {
            Err(ChannelError::new(format!("unexpected statement: {sql}")))
        }
    }

    async fn fetch_all(&self, sql: &str, _params: Vec<String>) -> Result<Vec<String>, ChannelError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call {
            sql: sql.to_string(),
            params: Vec::new(),
        });

        if state.fail == Some(FailOn::Select) {
            return Err(ChannelError::new(
                "injected: Unknown column in order clause",
            ));
        }

        let (table, terms) = parse_select(sql)?;
        let rows = state
            .tables
            .get(&table)
            .ok_or_else(|| ChannelError::new(format!("no such table `{table}`")))?
            .clone();
        let sorted = sort_rows(rows, &terms);

        if state.corrupt_reads {
            return Ok(sorted.iter().map(|_| "not json".to_string()).collect());
        }
        Ok(sorted)
    }
}

fn table_name(after_backtick: &str) -> Result<String, ChannelError> {
    after_backtick
        .split('`')
        .next()
        .map(str::to_string)
        .ok_or_else(|| ChannelError::new("malformed identifier"))
}

#[derive(Debug)]
struct OrderTerm {
    path: String,
    cast: Cast,
    descending: bool,
}

#[derive(Debug, Clone, Copy)]
enum Cast {
    Signed,
    Decimal,
    Char,
}

fn parse_select(sql: &str) -> Result<(String, Vec<OrderTerm>), ChannelError> {
    let rest = sql
        .strip_prefix("SELECT CAST(`doc` AS CHAR) FROM `")
        .ok_or_else(|| ChannelError::new(format!("unexpected query: {sql}")))?;
    let (table, clause) = rest
        .split_once("` ORDER BY ")
        .ok_or_else(|| ChannelError::new("query without ORDER BY"))?;

    // Terms are joined with ", " and each begins with "CAST(", while the
    // ", " inside JSON_EXTRACT(`doc`, '…') also occurs within a term. Split on
    // the inter-term boundary (", CAST(") and restore the stripped prefix.
    let terms = split_terms(clause)
        .into_iter()
        .map(|term| parse_term(&term))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((table.to_string(), terms))
}

/// Splits the ORDER BY clause into per-key terms. Terms are joined with ", "
/// and each starts with "CAST(", so the boundary is ", CAST(".
fn split_terms(clause: &str) -> Vec<String> {
    let mut terms = Vec::new();
    let mut current = String::new();
    for (index, piece) in clause.split(", CAST(").enumerate() {
        if index == 0 {
            current.push_str(piece);
        } else {
            terms.push(current);
            current = format!("CAST({piece}");
        }
    }
    terms.push(current);
    terms
}

fn parse_term(term: &str) -> Result<OrderTerm, ChannelError> {
    let bad = || ChannelError::new(format!("unparseable order term: {term}"));

    let rest = term
        .strip_prefix("CAST(JSON_UNQUOTE(JSON_EXTRACT(`doc`, '")
        .ok_or_else(bad)?;
    let (path_literal, rest) = rest.split_once("')) AS ").ok_or_else(bad)?;
    let (cast, direction) = rest.split_once(") ").ok_or_else(bad)?;

    let cast = match cast {
        "SIGNED" => Cast::Signed,
        "DECIMAL(60,30)" => Cast::Decimal,
        "CHAR" => Cast::Char,
        _ => return Err(bad()),
    };
    Ok(OrderTerm {
        path: path_literal.replace("''", "'").replace("\\\\", "\\"),
        cast,
        descending: direction == "DESC",
    })
}

/// Walks a MySQL JSON path (`$.a[0]."x y"`) through a document tree.
fn extract<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = doc;
    let mut chars = path.strip_prefix('$')?.chars().peekable();
    loop {
        match chars.next() {
            None => return Some(current),
            Some('.') => {
                let name = if chars.peek() == Some(&'"') {
                    chars.next();
                    let mut name = String::new();
                    while let Some(c) = chars.next() {
                        match c {
                            '\\' => {
                                if let Some(escaped) = chars.next() {
                                    name.push(escaped);
                                }
                            }
                            '"' => break,
                            other => name.push(other),
                        }
                    }
                    name
                } else {
                    let mut name = String::new();
                    while let Some(&c) = chars.peek() {
                        if c == '.' || c == '[' {
                            break;
                        }
                        name.push(c);
                        chars.next();
                    }
                    name
                };
                current = current.get(name.as_str())?;
            }
            Some('[') => {
                let mut digits = String::new();
                while let Some(&c) = chars.peek() {
                    if c == ']' {
                        break;
                    }
                    digits.push(c);
                    chars.next();
                }
                chars.next();
                current = current.get(digits.parse::<usize>().ok()?)?;
            }
            Some(_) => return None,
        }
    }
}

/// JSON_UNQUOTE: strings lose their quoting, everything else stays JSON text.
fn unquote(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

enum SortValue {
    Int(i64),
    Dec(BigDecimal),
    Text(String),
}

fn sort_value(row: &str, term: &OrderTerm) -> Option<SortValue> {
    let doc: Value = serde_json::from_str(row).ok()?;
    let raw = unquote(extract(&doc, &term.path)?);
    Some(match term.cast {
        Cast::Signed => SortValue::Int(leading_int(&raw)),
        Cast::Decimal => SortValue::Dec(
            BigDecimal::from_str(raw.trim()).unwrap_or_else(|_| BigDecimal::from(0)),
        ),
        // The staging table uses a case-insensitive collation.
        Cast::Char => SortValue::Text(raw.to_lowercase()),
    })
}

/// MySQL CAST(x AS SIGNED) on a string: numeric prefix, 0 when absent.
fn leading_int(s: &str) -> i64 {
    let trimmed = s.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().map(|v| sign * v).unwrap_or(0)
}

fn compare(a: &Option<SortValue>, b: &Option<SortValue>) -> Ordering {
    match (a, b) {
        // SQL NULL compares below every value.
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => match (x, y) {
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Dec(a), SortValue::Dec(b)) => a.cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        },
    }
}

fn sort_rows(rows: Vec<String>, terms: &[OrderTerm]) -> Vec<String> {
    let mut keyed: Vec<(Vec<Option<SortValue>>, String)> = rows
        .into_iter()
        .map(|row| {
            let keys = terms.iter().map(|term| sort_value(&row, term)).collect();
            (keys, row)
        })
        .collect();

    keyed.sort_by(|(a_keys, _), (b_keys, _)| {
        for (index, term) in terms.iter().enumerate() {
            let ordering = compare(&a_keys[index], &b_keys[index]);
            let ordering = if term.descending {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });

    keyed.into_iter().map(|(_, row)| row).collect()
}
