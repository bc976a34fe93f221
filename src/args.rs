//! Field arguments and storage-key canonicalization
//!
//! A field queried with arguments gets its own storage slot. The slot name is
//! the field name, or `field:<canonical args>` when arguments are present.
//! Canonical args are compact JSON with recursively sorted keys, so two
//! deep-equal argument records always land in the same slot.
//!
//! - `Unset` entries are dropped, as if the argument was never passed
//! - non-finite floats are written as bare `NaN`, `inf` or `-inf`; no JSON
//!   value serializes that way, so they never share a slot with `null`

use serde::{Deserialize, Serialize};

use crate::value::{Record, Value};

/// Arguments a field was queried with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldArgs {
    /// Used verbatim as a discriminator
    Literal(String),
    /// Argument name -> value
    Record(Record),
}

impl FieldArgs {
    /// Build argument record from `(name, value)` pairs
    pub fn record<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        FieldArgs::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Whether these arguments are equivalent to "no arguments"
    pub fn is_empty(&self) -> bool {
        match self {
            FieldArgs::Literal(_) => false,
            FieldArgs::Record(record) => record.values().all(Value::is_unset),
        }
    }

    /// Deterministic, key-order independent serialization
    pub fn canonical(&self) -> String {
        match self {
            FieldArgs::Literal(s) => s.clone(),
            FieldArgs::Record(record) => {
                let mut out = String::new();
                write_record(record, &mut out);
                out
            }
        }
    }
}

impl From<&str> for FieldArgs {
    fn from(s: &str) -> Self {
        FieldArgs::Literal(s.to_string())
    }
}

impl From<String> for FieldArgs {
    fn from(s: String) -> Self {
        FieldArgs::Literal(s)
    }
}

impl From<Record> for FieldArgs {
    fn from(record: Record) -> Self {
        FieldArgs::Record(record)
    }
}

impl From<serde_json::Value> for FieldArgs {
    fn from(json: serde_json::Value) -> Self {
        match Value::from(json) {
            Value::String(s) => FieldArgs::Literal(s),
            Value::Record(record) => FieldArgs::Record(record),
            Value::Null => FieldArgs::Record(Record::new()),
            other => FieldArgs::Literal(other.to_string()),
        }
    }
}

fn write_record(record: &Record, out: &mut String) {
    out.push('{');
    // `Record` is a BTreeMap, so entries come out sorted
    let entries = record.iter().filter(|(_, value)| !value.is_unset());
    for (index, (name, value)) in entries.enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&serde_json::Value::from(name.as_str()).to_string());
        out.push(':');
        write_value(value, out);
    }
    out.push('}');
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Float(f) if !f.is_finite() => out.push_str(&f.to_string()),
        Value::Record(record) => write_record(record, out),
        Value::List(items) => {
            out.push('[');
            for (index, item) in items.iter().enumerate() {
                if index > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_json().to_string()),
    }
}

/// Storage slot name for `field_name` queried with `args`
pub fn field_name_in_store(field_name: &str, args: Option<&FieldArgs>) -> String {
    match args {
        Some(args) if !args.is_empty() => {
            let key = format!("{}:{}", field_name, args.canonical());
            tracing::trace!(field = field_name, key = %key, "computed storage key");
            key
        }
        _ => field_name.to_string(),
    }
}
