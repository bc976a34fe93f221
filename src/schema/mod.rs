//! Schema Registry Adapter
//!
//! Read-only lookups the store needs from the schema: type by name, field by
//! name, a field's output type, and nullable unwrapping. A [`Schema`] can be
//! built programmatically, parsed from SDL ([`Schema::from_sdl`]) or
//! deserialized from JSON ([`Schema::from_json`]).

pub mod sdl;

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{MockError, Result};
use crate::value::Value;

/// Scalars every schema has, whether declared or not
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

const DEFAULT_QUERY_TYPE: &str = "Query";
const DEFAULT_MUTATION_TYPE: &str = "Mutation";

// =============================================================================
// Output Type
// =============================================================================

/// Declared output type of a field (`User`, `[User!]`, `String!`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputType {
    /// Reference to a named scalar, enum or object type
    Named(String),
    /// List of the inner type
    List(Box<OutputType>),
    /// Non-null wrapper around the inner type
    NonNull(Box<OutputType>),
}

impl OutputType {
    pub fn named(name: impl Into<String>) -> Self {
        OutputType::Named(name.into())
    }

    pub fn list(inner: OutputType) -> Self {
        OutputType::List(Box::new(inner))
    }

    pub fn non_null(inner: OutputType) -> Self {
        OutputType::NonNull(Box::new(inner))
    }

    /// Strip a non-null wrapper, if any
    pub fn nullable(&self) -> &OutputType {
        match self {
            OutputType::NonNull(inner) => inner,
            other => other,
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, OutputType::NonNull(_))
    }

    /// Innermost named type, through any list and non-null wrappers
    pub fn named_type(&self) -> &str {
        match self {
            OutputType::Named(name) => name,
            OutputType::List(inner) | OutputType::NonNull(inner) => inner.named_type(),
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputType::Named(name) => write!(f, "{}", name),
            OutputType::List(inner) => write!(f, "[{}]", inner),
            OutputType::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

impl FromStr for OutputType {
    type Err = MockError;

    fn from_str(s: &str) -> Result<Self> {
        sdl::parse_type_reference(s)
    }
}

impl TryFrom<String> for OutputType {
    type Error = MockError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<OutputType> for String {
    fn from(ty: OutputType) -> Self {
        ty.to_string()
    }
}

// =============================================================================
// Type Definitions
// =============================================================================

/// An argument accepted by a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: OutputType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

/// A field of an object type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: OutputType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ArgumentDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: OutputType) -> Self {
        Self {
            name: name.into(),
            ty,
            args: Vec::new(),
            description: None,
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, ty: OutputType) -> Self {
        self.args.push(ArgumentDef {
            name: name.into(),
            ty,
            default_value: None,
        });
        self
    }
}

/// Object type: a named set of fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    pub name: String,
    pub fields: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ObjectType {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            description: None,
        }
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

/// Enum type with its declared members, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumType {
    pub name: String,
    pub values: Vec<String>,
}

/// Custom or built-in scalar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScalarType {
    pub name: String,
}

/// Any named type the store can be asked to generate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NamedType {
    Object(ObjectType),
    Enum(EnumType),
    Scalar(ScalarType),
}

impl NamedType {
    pub fn name(&self) -> &str {
        match self {
            NamedType::Object(t) => &t.name,
            NamedType::Enum(t) => &t.name,
            NamedType::Scalar(t) => &t.name,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            NamedType::Object(t) => Some(t),
            _ => None,
        }
    }
}

// =============================================================================
// Schema
// =============================================================================

/// The set of types a store generates values for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    types: BTreeMap<String, NamedType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    query_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mutation_type: Option<String>,
}

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Empty schema containing only the built-in scalars
    pub fn new() -> Self {
        let mut schema = Self {
            types: BTreeMap::new(),
            query_type: None,
            mutation_type: None,
        };
        schema.ensure_builtin_scalars();
        schema
    }

    /// Parse a schema from SDL
    pub fn from_sdl(source: &str) -> Result<Self> {
        sdl::parse(source)
    }

    /// Deserialize a schema from its JSON form
    pub fn from_json(content: &str) -> Result<Self> {
        let mut schema: Schema = serde_json::from_str(content)?;
        schema.ensure_builtin_scalars();
        Ok(schema)
    }

    fn ensure_builtin_scalars(&mut self) {
        for name in BUILTIN_SCALARS {
            self.types
                .entry(name.to_string())
                .or_insert_with(|| NamedType::Scalar(ScalarType { name: name.to_string() }));
        }
    }

    /// Add or replace a type
    pub fn add_type(&mut self, ty: NamedType) {
        self.types.insert(ty.name().to_string(), ty);
    }

    /// Builder form of [`Schema::add_type`]
    pub fn with_type(mut self, ty: NamedType) -> Self {
        self.add_type(ty);
        self
    }

    pub fn set_query_type(&mut self, name: impl Into<String>) {
        self.query_type = Some(name.into());
    }

    pub fn set_mutation_type(&mut self, name: impl Into<String>) {
        self.mutation_type = Some(name.into());
    }

    pub(crate) fn named_type_mut(&mut self, name: &str) -> Option<&mut NamedType> {
        self.types.get_mut(name)
    }

    /// Name of the root read type, if the schema has one
    pub fn query_type_name(&self) -> Option<&str> {
        self.root_type_name(self.query_type.as_deref(), DEFAULT_QUERY_TYPE)
    }

    /// Name of the root write type, if the schema has one
    pub fn mutation_type_name(&self) -> Option<&str> {
        self.root_type_name(self.mutation_type.as_deref(), DEFAULT_MUTATION_TYPE)
    }

    fn root_type_name<'a>(&'a self, explicit: Option<&'a str>, default: &'a str) -> Option<&'a str> {
        match explicit {
            Some(name) => Some(name),
            None => self
                .types
                .get(default)
                .and_then(NamedType::as_object)
                .map(|t| t.name.as_str()),
        }
    }

    /// Whether `type_name` is the root read or root write type
    pub fn is_root_type(&self, type_name: &str) -> bool {
        self.query_type_name() == Some(type_name) || self.mutation_type_name() == Some(type_name)
    }

    /// All type names, sorted
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Look up any named type
    pub fn named_type(&self, name: &str) -> Result<&NamedType> {
        self.types.get(name).ok_or_else(|| MockError::UnknownType {
            type_name: name.to_string(),
            suggestion: suggest(self.types.keys().map(String::as_str), name),
        })
    }

    /// Look up an object type; other kinds of types are an error
    pub fn object_type(&self, name: &str) -> Result<&ObjectType> {
        self.named_type(name)?
            .as_object()
            .ok_or_else(|| MockError::NotAnObjectType {
                type_name: name.to_string(),
            })
    }

    /// Look up a field of an object type
    pub fn field(&self, type_name: &str, field_name: &str) -> Result<&FieldDef> {
        let object = self.object_type(type_name)?;
        object.field(field_name).ok_or_else(|| MockError::UnknownField {
            type_name: type_name.to_string(),
            field_name: field_name.to_string(),
            suggestion: suggest(object.fields.iter().map(|f| f.name.as_str()), field_name),
        })
    }

    /// Declared output type of a field, non-null wrapper stripped
    pub fn field_type(&self, type_name: &str, field_name: &str) -> Result<&OutputType> {
        Ok(self.field(type_name, field_name)?.ty.nullable())
    }

    /// Whether `ty` (after stripping non-null) names an object type
    pub fn is_object_output(&self, ty: &OutputType) -> bool {
        match ty.nullable() {
            OutputType::Named(name) => matches!(self.types.get(name), Some(NamedType::Object(_))),
            _ => false,
        }
    }
}

/// Best fuzzy match for `query` among `candidates`
fn suggest<'a>(candidates: impl Iterator<Item = &'a str>, query: &str) -> Option<String> {
    let matcher = SkimMatcherV2::default();
    let mut best: Option<(i64, &str)> = None;

    for candidate in candidates {
        if let Some(score) = matcher.fuzzy_match(candidate, query) {
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, candidate));
            }
        }
    }

    best.map(|(_, name)| name.to_string())
}
