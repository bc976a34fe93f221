//! Argument records for `get` and `set`
//!
//! The positional helpers on [`MockStore`](super::MockStore) build these, so
//! both calling styles go through the same code path.

use crate::args::FieldArgs;
use crate::value::{Key, Value};

/// Arguments of [`MockStore::get`](super::MockStore::get)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GetArgs {
    pub type_name: String,
    /// Entity identity. Root types fall back to the root key when omitted.
    pub key: Option<Key>,
    /// Empty: return a reference to the entity.
    /// One name: read that field. Several: follow references hop by hop.
    pub field_path: Vec<String>,
    /// Arguments of the last field in the path
    pub field_args: Option<FieldArgs>,
    /// Stored instead of a generated value when the slot is empty.
    /// With no field, a record seeding the entity.
    pub default_value: Option<Value>,
}

impl GetArgs {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    pub fn key(mut self, key: impl Into<Key>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn field(mut self, field_name: impl Into<String>) -> Self {
        self.field_path = vec![field_name.into()];
        self
    }

    pub fn path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.field_path = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn args(mut self, args: impl Into<FieldArgs>) -> Self {
        self.field_args = Some(args.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

/// Arguments of [`MockStore::set`](super::MockStore::set)
#[derive(Debug, Clone, PartialEq)]
pub struct SetArgs {
    pub type_name: String,
    pub key: Key,
    /// `None`: `value` is a record whose entries are set one by one
    pub field_name: Option<String>,
    pub field_args: Option<FieldArgs>,
    pub value: Value,
    /// Leave already-stored slots alone. Propagates to nested inserts.
    pub no_override: bool,
}

impl SetArgs {
    pub fn new(type_name: impl Into<String>, key: impl Into<Key>) -> Self {
        Self {
            type_name: type_name.into(),
            key: key.into(),
            field_name: None,
            field_args: None,
            value: Value::Unset,
            no_override: false,
        }
    }

    pub fn field(mut self, field_name: impl Into<String>) -> Self {
        self.field_name = Some(field_name.into());
        self
    }

    pub fn args(mut self, args: impl Into<FieldArgs>) -> Self {
        self.field_args = Some(args.into());
        self
    }

    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self
    }

    pub fn no_override(mut self) -> Self {
        self.no_override = true;
        self
    }
}
