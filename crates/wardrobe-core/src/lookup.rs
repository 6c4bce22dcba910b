//! # Lookup Module
//!
//! Schema-tolerant typed access to loosely-structured JSON records.
//!
//! Every logical field is described by an ordered list of candidate keys
//! (see `primitives`). The first key that is present with a non-null value
//! wins. Coercions never fail: malformed values fall back to defaults.

use crate::Gender;
use serde_json::Value;

/// First present, non-null value among `keys`.
#[must_use]
pub fn pick<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let object = value.as_object()?;
    keys.iter()
        .filter_map(|k| object.get(*k))
        .find(|v| !v.is_null())
}

/// View a container as a sequence.
///
/// Arrays are used as-is, objects contribute their values in document order,
/// anything else is empty.
#[must_use]
pub fn as_sequence(value: Option<&Value>) -> Vec<&Value> {
    match value {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(Value::Object(map)) => map.values().collect(),
        _ => Vec::new(),
    }
}

/// Boolean coercion: native booleans, non-zero numbers, `"1"` and `"true"`.
///
/// Strings are compared exactly, so `" 1 "` is false.
#[must_use]
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => s == "1" || s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Integer coercion with a fallback for unparsable or non-finite input.
///
/// Fractional values are truncated toward zero.
#[must_use]
pub fn to_int(value: Option<&Value>, fallback: i64) -> i64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(finite_to_int)),
        Some(Value::String(s)) => parse_numeric(s),
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        Some(Value::Null) => Some(0),
        _ => None,
    };
    parsed.unwrap_or(fallback)
}

/// Text coercion used for category keys. Numbers are rendered in decimal.
#[must_use]
pub fn to_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn parse_numeric(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n);
    }
    trimmed.parse::<f64>().ok().and_then(finite_to_int)
}

fn finite_to_int(f: f64) -> Option<i64> {
    f.is_finite().then_some(f as i64)
}

// =============================================================================
// RECORD ACCESSOR
// =============================================================================

/// Typed view over one catalog record.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a>(pub &'a Value);

impl<'a> Record<'a> {
    /// Raw value of a field.
    #[must_use]
    pub fn get(self, keys: &[&str]) -> Option<&'a Value> {
        pick(self.0, keys)
    }

    /// Nested container as a sequence of records.
    #[must_use]
    pub fn list(self, keys: &[&str]) -> Vec<Record<'a>> {
        as_sequence(self.get(keys)).into_iter().map(Record).collect()
    }

    /// Integer field with a fallback.
    #[must_use]
    pub fn int(self, keys: &[&str], fallback: i64) -> i64 {
        to_int(self.get(keys), fallback)
    }

    /// Integer field that is `None` when absent.
    #[must_use]
    pub fn opt_int(self, keys: &[&str]) -> Option<i64> {
        self.get(keys).map(|v| to_int(Some(v), 0))
    }

    /// Boolean field, false when absent.
    #[must_use]
    pub fn flag(self, keys: &[&str]) -> bool {
        self.get(keys).is_some_and(to_bool)
    }

    /// Boolean field that is `None` when absent.
    #[must_use]
    pub fn opt_flag(self, keys: &[&str]) -> Option<bool> {
        self.get(keys).map(to_bool)
    }

    /// Trimmed text field, empty when absent.
    #[must_use]
    pub fn text(self, keys: &[&str]) -> String {
        to_text(self.get(keys))
    }

    /// Trimmed text field that is `None` when absent.
    #[must_use]
    pub fn opt_text(self, keys: &[&str]) -> Option<String> {
        self.get(keys).map(|v| to_text(Some(v)))
    }

    /// Gender field, unisex when absent or unrecognized.
    #[must_use]
    pub fn gender(self, keys: &[&str]) -> Gender {
        Gender::parse(&self.text(keys))
    }
}

// =============================================================================
// TESTS
// =============================================================================
