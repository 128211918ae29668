//! Containment filters.
//!
//! A [`Filter`] is a JSON pattern; a document matches when it *contains* the
//! pattern, using the same rules as PostgreSQL's `jsonb @> jsonb`:
//!
//! - objects: every key of the pattern is present and its value is contained
//! - arrays: every element of the pattern is contained in some element
//! - scalars: equal (numbers compare numerically)
//!
//! `eq("role", "student")` therefore matches documents whose `role` is
//! `"student"`, and `contains("students", id)` matches documents whose
//! `students` array includes `id`.

use serde::Serialize;
use serde_json::{Map, Value, json};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    pattern: Map<String, Value>,
}

impl Filter {
    /// A filter that matches every document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-level field equality.
    pub fn eq(mut self, field: &str, value: impl Serialize) -> Self {
        self.pattern.insert(field.to_string(), json!(value));
        self
    }

    /// Membership of `value` in the top-level array `field`.
    pub fn contains(mut self, field: &str, value: impl Serialize) -> Self {
        let value = json!(value);
        match self.pattern.get_mut(field) {
            Some(Value::Array(items)) => items.push(value),
            _ => {
                self.pattern.insert(field.to_string(), Value::Array(vec![value]));
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.pattern.clone())
    }

    pub fn matches(&self, document: &Value) -> bool {
        self.pattern
            .iter()
            .all(|(field, expected)| match document.get(field) {
                Some(actual) => json_contains(actual, expected),
                None => false,
            })
    }
}

/// `document @> pattern`.
pub fn json_contains(document: &Value, pattern: &Value) -> bool {
    match (document, pattern) {
        (Value::Object(doc), Value::Object(pat)) => pat.iter().all(|(key, expected)| {
            doc.get(key)
                .is_some_and(|actual| json_contains(actual, expected))
        }),
        (Value::Array(doc), Value::Array(pat)) => pat
            .iter()
            .all(|expected| doc.iter().any(|actual| json_contains(actual, expected))),
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (a, b) => a == b,
    }
}
