//! Minimal selection executor
//!
//! Walks a tree of field selections against the store, resolving every
//! field through [`resolve_field`], and renders the result as JSON.
//! No query-language parsing and no validation beyond what the store
//! already does: selections are plain data, usually deserialized from JSON.
//!
//! ```json
//! [{ "name": "viewer", "selections": [{ "name": "id" }, { "name": "name" }] }]
//! ```
//!
//! - aliases pick the response key; the same field may appear under several
//! - `__typename` is answered from the parent type
//! - references with no sub-selection render as `{"$ref": {...}}`

use serde::{Deserialize, Serialize};
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;
use tracing::trace;

use crate::args::FieldArgs;
use crate::error::{MockError, Result};
use crate::resolver::{resolve_field, FieldContext, Resolution};
use crate::schema::OutputType;
use crate::store::MockStore;
use crate::value::Value;

const TYPENAME_FIELD: &str = "__typename";

/// Which root type an operation starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    fn default_type_name(self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
        }
    }
}

/// One selected field, with optional alias, arguments and sub-selections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<FieldArgs>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selections: Vec<Selection>,
}

impl Selection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            args: None,
            selections: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn args(mut self, args: impl Into<FieldArgs>) -> Self {
        self.args = Some(args.into());
        self
    }

    pub fn select(mut self, selections: impl IntoIterator<Item = Selection>) -> Self {
        self.selections.extend(selections);
        self
    }

    /// Key this field appears under in the response
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Parse a selection list from JSON
    pub fn list_from_json(content: &str) -> Result<Vec<Selection>> {
        Ok(serde_json::from_str(content)?)
    }
}

/// Execute `selections` against the root type of `operation`
pub fn execute(store: &mut MockStore, operation: OperationKind, selections: &[Selection]) -> Result<JsonValue> {
    let schema = store.schema();
    let root = match operation {
        OperationKind::Query => schema.query_type_name(),
        OperationKind::Mutation => schema.mutation_type_name(),
    };
    let root = root
        .map(str::to_string)
        .ok_or_else(|| MockError::UnknownType {
            type_name: operation.default_type_name().to_string(),
            suggestion: None,
        })?;

    trace!(root = %root, fields = selections.len(), "executing operation");
    resolve_selection_set(store, &root, None, selections).map(JsonValue::Object)
}

fn resolve_selection_set(
    store: &mut MockStore,
    type_name: &str,
    source: Option<&Value>,
    selections: &[Selection],
) -> Result<JsonMap<String, JsonValue>> {
    let mut output = JsonMap::new();

    for selection in selections {
        if selection.name == TYPENAME_FIELD {
            output.insert(
                selection.response_key().to_string(),
                JsonValue::String(type_name.to_string()),
            );
            continue;
        }

        let field_type = store
            .schema()
            .field_type(type_name, &selection.name)?
            .clone();
        let ctx = FieldContext::new(type_name, &selection.name)
            .with_args(selection.args.as_ref())
            .with_source(source);

        let value = match resolve_field(store, &ctx)? {
            Resolution::Value(value) => value,
            Resolution::Delegate => source
                .and_then(Value::as_record)
                .and_then(|record| record.get(&selection.name))
                .cloned()
                .unwrap_or(Value::Null),
        };

        let rendered = complete_value(store, &field_type, value, &selection.selections)?;
        output.insert(selection.response_key().to_string(), rendered);
    }

    Ok(output)
}

fn complete_value(
    store: &mut MockStore,
    field_type: &OutputType,
    value: Value,
    selections: &[Selection],
) -> Result<JsonValue> {
    match value {
        Value::Unset | Value::Null => Ok(JsonValue::Null),
        Value::List(items) => {
            let element_type = match field_type.nullable() {
                OutputType::List(inner) => inner.as_ref(),
                other => other,
            };
            items
                .into_iter()
                .map(|item| complete_value(store, element_type, item, selections))
                .collect::<Result<Vec<_>>>()
                .map(JsonValue::Array)
        }
        Value::Ref(reference) if !selections.is_empty() => {
            let type_name = reference.type_name.clone();
            let source = Value::Ref(reference);
            resolve_selection_set(store, &type_name, Some(&source), selections).map(JsonValue::Object)
        }
        Value::Record(_) if !selections.is_empty() => {
            let type_name = field_type.named_type().to_string();
            resolve_selection_set(store, &type_name, Some(&value), selections).map(JsonValue::Object)
        }
        other => Ok(other.to_json()),
    }
}
