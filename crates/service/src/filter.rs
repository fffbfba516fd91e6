//! In-memory row filtering.
//!
//! The backend is asked for the whole table; narrowing happens here with a
//! linear scan over raw rows, before they are decoded into records.

use std::collections::HashMap;

use models::ResourceKind;
use serde_json::Value;

/// Query keys that never become field filters.
pub const RESERVED_KEYS: [&str; 3] = ["page", "per_page", "q"];

#[derive(Clone, Debug, PartialEq)]
pub enum Clause {
    /// Scalar equality on the string form; numbers compare numerically.
    Equals { field: String, value: String },
    /// Case-insensitive substring.
    Contains { field: String, needle: String },
    /// Passes when any of `fields` contains `needle`.
    Search { fields: Vec<String>, needle: String },
}

/// Conjunction of clauses. The empty filter passes every row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowFilter {
    clauses: Vec<Clause>,
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn field_contains(row: &Value, field: &str, needle_lower: &str) -> bool {
    row.get(field)
        .and_then(scalar_text)
        .is_some_and(|text| text.to_lowercase().contains(needle_lower))
}

fn field_equals(row: &Value, field: &str, expected: &str) -> bool {
    let Some(actual) = row.get(field) else { return false };
    if let (Some(a), Ok(b)) = (actual.as_f64(), expected.parse::<f64>()) {
        return a == b;
    }
    scalar_text(actual).is_some_and(|text| text == expected)
}

impl Clause {
    pub fn matches(&self, row: &Value) -> bool {
        match self {
            Clause::Equals { field, value } => field_equals(row, field, value),
            Clause::Contains { field, needle } => field_contains(row, field, &needle.to_lowercase()),
            Clause::Search { fields, needle } => {
                let needle = needle.to_lowercase();
                fields.iter().any(|f| field_contains(row, f, &needle))
            }
        }
    }
}

impl RowFilter {
    pub fn new() -> Self { Self::default() }

    pub fn equals(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.clauses.push(Clause::Equals { field: field.into(), value: value.into() });
        self
    }

    pub fn contains(mut self, field: impl Into<String>, needle: impl Into<String>) -> Self {
        self.clauses.push(Clause::Contains { field: field.into(), needle: needle.into() });
        self
    }

    pub fn search<I, S>(mut self, fields: I, needle: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clauses.push(Clause::Search {
            fields: fields.into_iter().map(Into::into).collect(),
            needle: needle.into(),
        });
        self
    }

    /// Build from list query parameters.
    ///
    /// `q` searches the resource's search fields; other non-reserved keys
    /// are exact matches. Blank values are ignored.
    pub fn from_query(kind: ResourceKind, params: &HashMap<String, String>) -> Self {
        let mut filter = Self::new();
        if let Some(q) = params.get("q").map(|q| q.trim()).filter(|q| !q.is_empty()) {
            filter = filter.search(kind.search_fields().iter().copied(), q);
        }
        let mut keys: Vec<&String> = params
            .keys()
            .filter(|k| !RESERVED_KEYS.contains(&k.as_str()))
            .collect();
        keys.sort();
        for key in keys {
            let value = params[key].trim();
            if !value.is_empty() {
                filter = filter.equals(key.as_str(), value);
            }
        }
        filter
    }

    pub fn clauses(&self) -> &[Clause] { &self.clauses }

    pub fn is_empty(&self) -> bool { self.clauses.is_empty() }

    pub fn matches(&self, row: &Value) -> bool {
        self.clauses.iter().all(|c| c.matches(row))
    }

    pub fn apply(&self, rows: Vec<Value>) -> Vec<Value> {
        if self.is_empty() {
            return rows;
        }
        rows.into_iter().filter(|r| self.matches(r)).collect()
    }
}
