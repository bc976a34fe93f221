//! Dynamic values held by the mock store
//!
//! Everything the store hands out or accepts is a [`Value`]. Object-typed
//! fields are never stored inline: they are always a [`Ref`] pointing at an
//! entity stored under its own type and key.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::json;
use std::collections::BTreeMap;
use std::fmt;

/// Field name -> value map. Sorted, so serialization is key-order independent.
pub type Record = BTreeMap<String, Value>;

/// JSON key marking a reference
pub const REF_KEY: &str = "$ref";

// =============================================================================
// Key
// =============================================================================

/// Identity of an entity, unique within its type
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Int(i64),
    String(String),
}

impl Key {
    /// Interpret a value as an identity (strings and integers only)
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Key::String(s.clone())),
            Value::Int(i) => Some(Key::Int(*i)),
            _ => None,
        }
    }

    /// The value a key field holds for this identity
    pub fn to_value(&self) -> Value {
        match self {
            Key::String(s) => Value::String(s.clone()),
            Key::Int(i) => Value::Int(*i),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Key::String(s) => Some(s),
            Key::Int(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::String(s) => write!(f, "{}", s),
            Key::Int(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::String(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::String(s)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Int(i)
    }
}

impl From<i32> for Key {
    fn from(i: i32) -> Self {
        Key::Int(i64::from(i))
    }
}

// =============================================================================
// Ref
// =============================================================================

/// Pointer to an entity stored under `type_name` with identity `key`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ref {
    #[serde(rename = "typeName")]
    pub type_name: String,
    pub key: Key,
}

impl Ref {
    pub fn new(type_name: impl Into<String>, key: impl Into<Key>) -> Self {
        Self {
            type_name: type_name.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.key)
    }
}

// =============================================================================
// Value
// =============================================================================

/// A dynamically-typed mock value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absent value: an unoccupied list slot, an omitted argument, or a mock
    /// that produced nothing. Never returned by the store.
    #[default]
    Unset,
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Record(Record),
    Ref(Ref),
}

impl Value {
    /// An empty record (`{}`)
    pub fn empty_record() -> Self {
        Value::Record(Record::new())
    }

    /// Build a record from `(field, value)` pairs
    pub fn record<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Value::Unset)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Whether this value counts as "provided" when it comes from a mock.
    ///
    /// `Unset`, `Null`, `false`, `0`, `0.0`, `NaN` and `""` are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Unset | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::List(_) | Value::Record(_) | Value::Ref(_) => true,
        }
    }

    pub fn as_ref_value(&self) -> Option<&Ref> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Short name of the runtime shape, for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Unset => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Record(_) => "record",
            Value::Ref(_) => "reference",
        }
    }

    /// Convert to JSON. `Unset` and non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Unset | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Record(record) => serde_json::Value::Object(
                record
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Ref(r) => json!({
                REF_KEY: {
                    "typeName": r.type_name,
                    "key": serde_json::to_value(&r.key).unwrap_or(serde_json::Value::Null),
                }
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Unset => write!(f, "undefined"),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

/// Recognizes `{"$ref": {"typeName": ..., "key": ...}}` as a [`Ref`].
/// A bare `{"$ref": <key>}` stays a record; the store resolves it against
/// the declared field type.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(inner) = map.get(REF_KEY) {
                        if let Ok(r) = serde_json::from_value::<Ref>(inner.clone()) {
                            return Value::Ref(r);
                        }
                    }
                }
                Value::Record(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Ref> for Value {
    fn from(r: Ref) -> Self {
        Value::Ref(r)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        key.to_value()
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falsy_values() {
        for value in [
            Value::Unset,
            Value::Null,
            Value::Bool(false),
            Value::Int(0),
            Value::Float(0.0),
            Value::Float(f64::NAN),
            Value::String(String::new()),
        ] {
            assert!(!value.is_truthy(), "{:?} should be falsy", value);
        }
        assert!(Value::List(vec![]).is_truthy());
        assert!(Value::empty_record().is_truthy());
        assert!(Value::Int(-1).is_truthy());
    }

    #[test]
    fn test_ref_from_json() {
        let value = Value::from(json!({"$ref": {"typeName": "User", "key": "abc"}}));
        assert_eq!(value, Value::Ref(Ref::new("User", "abc")));

        let numeric = Value::from(json!({"$ref": {"typeName": "User", "key": 7}}));
        assert_eq!(numeric, Value::Ref(Ref::new("User", 7)));
    }

    #[test]
    fn test_bare_ref_stays_record() {
        let value = Value::from(json!({"$ref": "abc"}));
        let record = value.as_record().unwrap();
        assert_eq!(record.get(REF_KEY), Some(&Value::from("abc")));
    }

    #[test]
    fn test_ref_json_shape() {
        let value = Value::Ref(Ref::new("User", "u1"));
        assert_eq!(
            value.to_json(),
            json!({"$ref": {"typeName": "User", "key": "u1"}})
        );
        assert_eq!(Value::from(value.to_json()), value);
    }

    #[test]
    fn test_key_from_value() {
        assert_eq!(Key::from_value(&Value::from("x")), Some(Key::from("x")));
        assert_eq!(Key::from_value(&Value::Int(3)), Some(Key::Int(3)));
        assert_eq!(Key::from_value(&Value::Bool(true)), None);
    }

    #[test]
    fn test_display_is_compact_json() {
        let value = Value::record([("b", Value::Int(1)), ("a", Value::from("x"))]);
        assert_eq!(value.to_string(), r#"{"a":"x","b":1}"#);
        assert_eq!(Value::Unset.to_string(), "undefined");
    }
}
